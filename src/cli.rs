use crate::updater::UseReleasesConfig;
use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "pom-releases",
    about = "Replace -SNAPSHOT dependency versions in a Maven pom.xml with their released versions",
    version,
    author
)]
pub struct Cli {
    /// Project directory or pom.xml (defaults to current directory)
    #[arg(short, long, default_value = ".")]
    pub path: String,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Rewrite snapshot versions to the matching releases
    UseReleases {
        #[command(flatten)]
        options: ReleaseOptions,

        /// Don't keep pom.xml.versionsBackup copies of modified descriptors
        #[arg(long)]
        no_backup: bool,

        /// Resolve releases but leave the descriptors untouched
        #[arg(long)]
        dry_run: bool,
    },

    /// Show which snapshots would be replaced without modifying anything
    Check {
        #[command(flatten)]
        options: ReleaseOptions,
    },
}

#[derive(Args, Debug, Clone)]
pub struct ReleaseOptions {
    /// Accept the last released version starting with the snapshot's base version
    #[arg(long)]
    pub allow_range_matching: bool,

    /// Zero-fill minor/incremental versions before range matching (4.2 -> 4.2.0)
    #[arg(long)]
    pub pad_version_for_range_matching: bool,

    /// Read known versions from a properties file (groupId:artifactId=v1,v2,...)
    #[arg(long, value_name = "FILE")]
    pub dependencies_property_file: Option<PathBuf>,

    /// Fail when a snapshot cannot be replaced by a release
    #[arg(long)]
    pub fail_if_not_replaced: bool,

    /// Also update the <parent> version
    #[arg(long)]
    pub process_parent: bool,

    /// Update versions in <dependencyManagement>
    #[arg(long, default_value_t = true, action = ArgAction::Set, value_name = "BOOL")]
    pub process_dependency_management: bool,

    /// Update versions in <dependencies>
    #[arg(long, default_value_t = true, action = ArgAction::Set, value_name = "BOOL")]
    pub process_dependencies: bool,

    /// Leave dependencies built by the same multi-module project alone
    #[arg(long, default_value_t = true, action = ArgAction::Set, value_name = "BOOL")]
    pub exclude_reactor: bool,

    /// Only update artifacts matching these patterns (groupId:artifactId:type:classifier:version)
    #[arg(long, value_name = "PATTERNS")]
    pub includes: Vec<String>,

    /// Never update artifacts matching these patterns
    #[arg(long, value_name = "PATTERNS")]
    pub excludes: Vec<String>,

    /// Repository to query, repeatable (defaults to the pom's <repositories> or Maven Central)
    ///
    /// Repositories on localhost, loopback or private network addresses (10.x, 172.16-31.x,
    /// 192.168.x, fc00::/7) are rejected, whether given here or declared in the pom. Use a
    /// --dependencies-property-file to work against an internal repository manager.
    #[arg(long = "repository", value_name = "URL")]
    pub repositories: Vec<String>,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

impl ReleaseOptions {
    pub fn to_config(&self) -> UseReleasesConfig {
        UseReleasesConfig {
            allow_range_matching: self.allow_range_matching,
            pad_version_for_range_matching: self.pad_version_for_range_matching,
            dependencies_property_file: self.dependencies_property_file.clone(),
            fail_if_not_replaced: self.fail_if_not_replaced,
            process_parent: self.process_parent,
            process_dependency_management: self.process_dependency_management,
            process_dependencies: self.process_dependencies,
            exclude_reactor: self.exclude_reactor,
            includes: self.includes.clone(),
            excludes: self.excludes.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::updater::MatchPolicy;
    use clap::CommandFactory;

    #[test]
    fn defaults_match_plugin_defaults() {
        let cli = Cli::parse_from(["pom-releases", "use-releases"]);
        let Commands::UseReleases { options, no_backup, dry_run } = cli.command else {
            panic!("expected use-releases");
        };
        let config = options.to_config();
        assert!(!config.allow_range_matching);
        assert!(!config.fail_if_not_replaced);
        assert!(!config.process_parent);
        assert!(config.process_dependency_management);
        assert!(config.process_dependencies);
        assert!(config.exclude_reactor);
        assert!(!no_backup);
        assert!(!dry_run);
    }

    #[test]
    fn parses_explicit_options() {
        let cli = Cli::parse_from([
            "pom-releases",
            "--path",
            "service",
            "check",
            "--allow-range-matching",
            "--pad-version-for-range-matching",
            "--exclude-reactor",
            "false",
            "--includes",
            "org.example:*",
            "--repository",
            "https://repo.example.com/maven2",
        ]);
        assert_eq!(cli.path, "service");
        let Commands::Check { options } = cli.command else {
            panic!("expected check");
        };
        let config = options.to_config();
        assert!(config.allow_range_matching);
        assert!(config.pad_version_for_range_matching);
        assert!(!config.exclude_reactor);
        assert_eq!(config.includes, vec!["org.example:*"]);
        assert_eq!(options.repositories, vec!["https://repo.example.com/maven2"]);
    }

    #[test]
    fn padding_alone_keeps_exact_matching() {
        let cli = Cli::parse_from([
            "pom-releases",
            "use-releases",
            "--pad-version-for-range-matching",
        ]);
        let Commands::UseReleases { options, .. } = cli.command else {
            panic!("expected use-releases");
        };
        assert_eq!(options.to_config().match_policy(), MatchPolicy::Exact);
    }

    #[test]
    fn repository_help_mentions_private_host_rejection() {
        let mut cmd = Cli::command();
        let help = cmd
            .find_subcommand_mut("use-releases")
            .unwrap()
            .render_long_help()
            .to_string();
        assert!(help.contains("private network addresses"));
        assert!(help.contains("--dependencies-property-file"));
    }
}
