// Copyright 2026 StudyMatch Contributors
// SPDX-License-Identifier: Apache-2.0

//! `studymatch serve`: run the JSON API in the foreground.

use crate::cli::output::{self, Styled};
use crate::cli::{load_matcher, open_registry};
use crate::config::StudyMatchConfig;
use crate::server::{self, AppState};
use anyhow::Result;
use std::sync::Arc;
use tracing::info;

pub async fn run(config: &StudyMatchConfig, bind: Option<&str>) -> Result<()> {
    let s = Styled::new();
    let matcher = load_matcher(config)?;
    let registry = open_registry(config)?;
    let bind = bind.unwrap_or(&config.server.bind);

    info!("starting StudyMatch v{}", env!("CARGO_PKG_VERSION"));
    if !output::is_quiet() {
        eprintln!(
            "  {} StudyMatch v{} serving on http://{bind}",
            s.ok_sym(),
            env!("CARGO_PKG_VERSION")
        );
        eprintln!("  {}", s.dim("Press Ctrl-C to stop."));
    }

    let state = Arc::new(AppState::new(matcher, registry));
    server::serve(state, bind).await?;

    if !output::is_quiet() {
        eprintln!("  {} Stopped.", s.ok_sym());
    }
    Ok(())
}
