// Copyright 2026 StudyMatch Contributors
// SPDX-License-Identifier: Apache-2.0

//! `studymatch fit`: train artifacts from historical users and seed the registry.

use crate::cli::open_registry;
use crate::cli::output::{self, Styled};
use crate::config::StudyMatchConfig;
use crate::registry::MembershipStore;
use crate::training::{self, FitOptions};
use anyhow::{bail, Context, Result};
use std::path::Path;
use std::time::Instant;
use tracing::info;

/// Run the fit command.
pub fn run(
    config: &StudyMatchConfig,
    users: &Path,
    clusters: Option<usize>,
    force: bool,
) -> Result<()> {
    let s = Styled::new();
    let start = Instant::now();

    let options = FitOptions {
        clusters: clusters.unwrap_or(config.fit.clusters),
        ..config.fit.clone()
    };

    let registry = open_registry(config)?;
    let existing = registry.len()?;
    if existing > 0 && !force {
        bail!(
            "registry {} already holds {existing} memberships; pass --force to append the seed rows anyway",
            config.registry_path.display()
        );
    }

    let profiles = training::load_users(users)
        .with_context(|| format!("loading users from {}", users.display()))?;
    let report = training::fit(&profiles, &options)?;

    report
        .artifacts
        .save(&config.model_path, &config.scaler_path)
        .context("saving model artifacts")?;
    let ids = registry.append_batch(&report.memberships)?;
    info!(users = profiles.len(), seeded = ids.len(), "fit complete");

    if output::is_json() {
        output::print_json(&serde_json::json!({
            "users": profiles.len(),
            "clusters": report.cluster_count(),
            "iterations": report.iterations,
            "inertia": report.inertia,
            "seeded": ids.len(),
            "model_path": config.model_path,
            "scaler_path": config.scaler_path,
        }));
        return Ok(());
    }

    if !output::is_quiet() {
        output::print_header(&s);
        output::print_check(s.ok_sym(), "Users:", &profiles.len().to_string());
        output::print_check(s.ok_sym(), "Clusters:", &report.cluster_count().to_string());
        output::print_check(
            s.ok_sym(),
            "Iterations:",
            &format!("{} (inertia {:.3})", report.iterations, report.inertia),
        );
        output::print_check(s.ok_sym(), "Seeded:", &format!("{} memberships", ids.len()));
        output::print_check(s.ok_sym(), "Model:", &config.model_path.display().to_string());
        eprintln!();
        eprintln!("  {}", s.dim(&format!("Done in {:.1}s", start.elapsed().as_secs_f64())));
    }
    Ok(())
}
