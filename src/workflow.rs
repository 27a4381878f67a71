use crate::cli::ReleaseOptions;
use crate::error::Result;
use crate::log::{ConsoleLog, Log};
use crate::maven::RemoteRepository;
use crate::pom::{PomDocument, Reactor};
use crate::repository::VersionSourceFactory;
use crate::updater::{DependencyUpdatePlanner, UpdateReport};
use crate::utils::PathValidator;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use serde::Serialize;
use std::path::Path;

/// How a run treats the descriptors it updates.
#[derive(Debug, Clone, Copy)]
pub struct RunMode {
    pub dry_run: bool,
    pub backup: bool,
    pub verbose: bool,
}

#[derive(Debug, Serialize)]
struct ModuleReport {
    pom: String,
    written: bool,
    #[serde(flatten)]
    report: UpdateReport,
}

/// Execute the use-releases workflow over every project of the reactor
pub fn execute_use_releases<P: AsRef<Path>>(
    project_path: P,
    options: &ReleaseOptions,
    mode: RunMode,
) -> Result<()> {
    let show = !options.json;
    let config = options.to_config();

    if show {
        let title = if mode.dry_run {
            "Checking for snapshot versions with releases..."
        } else {
            "Replacing snapshot versions with releases..."
        };
        println!("{}", title.cyan().bold());
        println!("\n{}", "1. Validating project structure...".yellow());
    }

    let root_pom = PathValidator::locate_pom(project_path)?;
    let reactor = Reactor::discover(&root_pom)?;
    let root_dir = root_pom.parent().unwrap_or(Path::new(".")).to_path_buf();

    if show {
        println!(
            "{}",
            format!("✓ Found {} project(s) in the reactor", reactor.projects().len()).green()
        );
        println!("\n{}", "2. Resolving version source...".yellow());
    }

    let property_file = match &config.dependencies_property_file {
        Some(path) => Some(PathValidator::validate_input_file(path)?),
        None => None,
    };

    let repositories = if options.repositories.is_empty() {
        repositories_from_pom(&root_pom)?
    } else {
        options
            .repositories
            .iter()
            .enumerate()
            .map(|(i, url)| RemoteRepository::new(format!("cli-{}", i + 1), url.as_str()))
            .collect()
    };

    let source = VersionSourceFactory::create(property_file.as_deref(), repositories.clone())?;

    if show {
        match &property_file {
            Some(path) => println!("   Using file for use-releases: {}", path.display()),
            None => {
                println!("   Using repositories for use-releases:");
                for repo in &repositories {
                    println!("   • {} ({})", repo.id.bright_cyan(), repo.url.dimmed());
                }
            }
        }
        println!("\n{}", "3. Updating descriptors...".yellow());
    }

    let pb = ProgressBar::new(reactor.projects().len() as u64);
    if !show {
        pb.set_draw_target(ProgressDrawTarget::hidden());
    }
    pb.set_style(
        ProgressStyle::default_bar()
            .template("  [{bar:40}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-"),
    );

    let log = if show {
        ConsoleLog::with_progress(mode.verbose, pb.clone())
    } else {
        ConsoleLog::quiet()
    };
    log.debug(&format!("Version source: {}", source.describe()));

    let planner = DependencyUpdatePlanner::new(&config, source.as_ref(), &log)?;

    let mut reports = Vec::new();
    for project in reactor.projects() {
        let display = project
            .pom_path
            .strip_prefix(&root_dir)
            .unwrap_or(&project.pom_path)
            .display()
            .to_string();
        pb.set_message(format!("Processing {}", display));

        let mut doc = PomDocument::load(&project.pom_path)?;
        let model = doc.model()?;
        let result = planner.update(&model, &reactor, &mut doc);
        let report = match result {
            Ok(report) => report,
            Err(e) => {
                pb.abandon();
                return Err(e);
            }
        };

        let written = !mode.dry_run && !report.is_empty();
        if written {
            doc.save(mode.backup)?;
        }

        reports.push(ModuleReport {
            pom: display,
            written,
            report,
        });
        pb.inc(1);
    }
    pb.finish_and_clear();

    if options.json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
        return Ok(());
    }

    println!("{}", "✓ Update completed".green());
    print_reports(&reports, mode.dry_run);

    if mode.dry_run {
        println!("\n{}", "To apply these updates, run:".dimmed());
        println!("  {}", "pom-releases use-releases".cyan());
    } else {
        println!(
            "\n{}",
            "✨ Update process completed successfully!".green().bold()
        );
    }

    Ok(())
}

/// Execute the check workflow (dry-run)
pub fn execute_check<P: AsRef<Path>>(
    project_path: P,
    options: &ReleaseOptions,
    verbose: bool,
) -> Result<()> {
    execute_use_releases(
        project_path,
        options,
        RunMode {
            dry_run: true,
            backup: false,
            verbose,
        },
    )
}

/// Repositories declared in the root descriptor, followed by Maven Central.
fn repositories_from_pom(root_pom: &Path) -> Result<Vec<RemoteRepository>> {
    let mut repositories = PomDocument::load(root_pom)?.model()?.repositories;
    let central = RemoteRepository::maven_central();
    if !repositories.iter().any(|r| r.url == central.url) {
        repositories.push(central);
    }
    Ok(repositories)
}

fn print_reports(reports: &[ModuleReport], dry_run: bool) {
    let total: usize = reports.iter().map(|m| m.report.total_updates()).sum();
    let unresolved: usize = reports.iter().map(|m| m.report.unresolved.len()).sum();

    if total == 0 && unresolved == 0 {
        println!("\n{}", "✨ No snapshot versions to replace!".green().bold());
        return;
    }

    let verb = if dry_run { "can be replaced" } else { "replaced" };
    println!(
        "\n{}",
        format!("📦 {} snapshot version(s) {}", total, verb).cyan().bold()
    );

    for module in reports {
        let report = &module.report;
        if report.is_empty() && report.unresolved.is_empty() {
            continue;
        }

        println!("\n{}", module.pom.white().bold());
        print_section("Parent", &report.parent_updates);
        print_section("Dependency management", &report.managed_updates);
        print_section("Dependencies", &report.dependency_updates);

        if !report.unresolved.is_empty() {
            println!("  {}:", "No release found".yellow());
            for name in &report.unresolved {
                println!("    • {}", name.dimmed());
            }
        }
    }
}

fn print_section(
    label: &str,
    updates: &std::collections::BTreeMap<String, (String, String)>,
) {
    if updates.is_empty() {
        return;
    }

    println!("  {}:", label.cyan());
    for (name, (old, new)) in updates {
        println!(
            "    • {} {} → {}",
            name.white().bold(),
            old.red(),
            new.green().bold()
        );
    }
}
