//
//  bbdc-cli
//  cli/doctor.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Environment and connectivity check

use anyhow::{Context, Result};
use clap::Args;
use serde_json::Value;

use super::GlobalOptions;
use crate::api::pullrequests as prs;
use crate::api::PagedResponse;
use crate::config::{ENV_SERVER, ENV_TOKEN};

/// Check that the environment is configured and the server is reachable
///
/// Validates the two environment variables, then makes one authenticated
/// request against the pull-request dashboard.
#[derive(Args, Debug)]
pub struct DoctorCommand {}

impl DoctorCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        let client = super::client()?;
        let output = global.output();

        let query = [
            ("limit".to_string(), "1".to_string()),
            ("start".to_string(), "0".to_string()),
        ];
        let page: PagedResponse<Value> = client
            .get_query(prs::dashboard_path(), &query)
            .await
            .context("Server is configured but the dashboard request failed")?;

        output.write_success(&format!(
            "{} and {} look usable.",
            ENV_SERVER, ENV_TOKEN
        ));
        output.write_info(&format!(
            "Dashboard responded with {} pull request{} on the first page.",
            page.size,
            if page.size == 1 { "" } else { "s" }
        ));
        Ok(())
    }
}
