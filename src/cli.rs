use crate::app::dto::{CollectRequest, IdentityDto, ReductionKind};
use crate::app::engine::StaleEngine;
use crate::domain::identity::ObjectIdentity;
use anyhow::{Context as _, Result};

/// Parse `name#kind` arguments into request identities.
pub fn parse_identity_args(args: &[String]) -> Result<Vec<IdentityDto>> {
    args.iter()
        .map(|arg| {
            let identity: ObjectIdentity = arg
                .parse()
                .with_context(|| format!("Invalid identity argument: {arg}"))?;
            Ok(IdentityDto::from(&identity))
        })
        .collect()
}

pub fn collect_and_display(
    engine: &StaleEngine,
    reference: &str,
    changed: &[String],
    removed: &[String],
    reduction: ReductionKind,
    json: bool,
) -> Result<()> {
    let result = engine.collect(CollectRequest {
        reference_project: reference.to_string(),
        added_or_changed: parse_identity_args(changed)?,
        removed: parse_identity_args(removed)?,
        reduction,
        max_depth: None,
    })?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    println!("Stale dependencies for build of: {}", result.reference_project);
    println!("  Projects affected: {}", result.project_count);
    println!("  Edges collected:   {}", result.edge_count);
    println!("{}", "=".repeat(80));

    for project in &result.projects {
        println!("\n[{}] {} stale artifact(s)", project.project, project.stale.len());
        for edge in &project.edges {
            println!(
                "    {}#{} -[{}]-> {}#{}",
                edge.source.qualified_name,
                edge.source.kind,
                edge.kind,
                edge.target.qualified_name,
                edge.target.kind
            );
        }
    }

    if !result.build_roots.is_empty() {
        println!("\nBuild roots: {}", result.build_roots.join(", "));
    }
    Ok(())
}

pub fn list_projects(engine: &StaleEngine) -> Result<()> {
    let result = engine.projects();
    println!("{} project(s):", result.projects.len());
    println!("{}", "=".repeat(80));

    for project in &result.projects {
        let mut flags = Vec::new();
        if !project.buildable {
            flags.push("not buildable");
        }
        if !project.indexed {
            flags.push("no index");
        }
        let suffix = if flags.is_empty() {
            String::new()
        } else {
            format!(" ({})", flags.join(", "))
        };
        println!("{} - {} edge(s){}", project.name, project.edge_count, suffix);
        if !project.references.is_empty() {
            println!("    references:    {}", project.references.join(", "));
        }
        if !project.referenced_by.is_empty() {
            println!("    referenced by: {}", project.referenced_by.join(", "));
        }
    }
    Ok(())
}

pub fn search_identities(engine: &StaleEngine, pattern: &str, limit: Option<usize>) -> Result<()> {
    println!("Searching for identities matching: \"{}\"", pattern);
    println!("{}", "=".repeat(80));
    let result = engine.search(pattern, limit)?;

    println!("Found {} match(es):\n", result.total_matches);
    if let Some(lim) = limit.filter(|&lim| result.total_matches > lim) {
        println!("Showing first {}:\n", lim);
    }

    for (i, item) in result.items.iter().enumerate() {
        println!(
            "{}. [{}] {}#{}",
            i + 1,
            item.project,
            item.identity.qualified_name,
            item.identity.kind
        );
    }
    Ok(())
}
