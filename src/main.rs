use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use referral_network::tree::{find_with, leg_label};
use referral_network::{
    JsonFileStore, Member, MemberStore, NetworkConfig, NetworkMember, SearchQuery,
    SponsorMatching, StatsCalculator, TreeBuilder,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "referral-network", about = "Referral network trees and team statistics")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug)]
struct NetworkArgs {
    /// Member records (JSON array, or an object with a `members`/`users` array).
    members: PathBuf,
    /// Children placed under one member.
    #[arg(long, default_value_t = referral_network::MAX_CHILDREN)]
    max_children: usize,
    /// Sponsor reference matching: dual, referral-code or identity.
    #[arg(long, default_value_t = SponsorMatching::Dual)]
    sponsor_matching: SponsorMatching,
}

impl NetworkArgs {
    fn config(&self) -> NetworkConfig {
        NetworkConfig {
            max_children: self.max_children,
            sponsor_matching: self.sponsor_matching,
        }
    }

    fn load(&self) -> Result<Vec<Member>> {
        JsonFileStore::new(&self.members)
            .fetch_all()
            .context("failed to load member snapshot")
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the placement tree under a member.
    Tree {
        #[command(flatten)]
        network: NetworkArgs,
        /// Identity of the root member.
        root: String,
        /// Deepest level to print (root = 0).
        #[arg(long)]
        max_depth: Option<usize>,
    },
    /// Search the placement tree by name or referral code.
    Find {
        #[command(flatten)]
        network: NetworkArgs,
        /// Identity of the root member.
        root: String,
        /// Case-insensitive substring of a name or referral code.
        query: String,
        /// List every match instead of the first.
        #[arg(long)]
        all: bool,
    },
    /// Print direct referrals and team size for a member.
    Stats {
        #[command(flatten)]
        network: NetworkArgs,
        /// Identity of the member.
        member: String,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "referral_network=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Tree {
            network,
            root,
            max_depth,
        } => run_tree(&network, &root, max_depth)?,
        Commands::Find {
            network,
            root,
            query,
            all,
        } => run_find(&network, &root, &query, all)?,
        Commands::Stats { network, member } => run_stats(&network, &member)?,
    }

    Ok(())
}

fn build(network: &NetworkArgs, root_id: &str) -> Result<NetworkMember> {
    let builder = TreeBuilder::new(network.config()).context("invalid network configuration")?;
    let members = network.load()?;
    let root = lookup(&members, root_id)?;
    Ok(builder.build(root, &members))
}

fn lookup<'a>(members: &'a [Member], id: &str) -> Result<&'a Member> {
    members
        .iter()
        .find(|member| member.id == id.trim())
        .ok_or_else(|| anyhow::anyhow!("unknown member id '{}'", id))
}

fn run_tree(network: &NetworkArgs, root_id: &str, max_depth: Option<usize>) -> Result<()> {
    let tree = build(network, root_id)?;

    for visit in tree.walk() {
        if max_depth.is_some_and(|max| visit.depth > max) {
            continue;
        }
        let label = if visit.depth == 0 {
            String::new()
        } else {
            format!("[{}] ", leg_label(visit.position))
        };
        println!(
            "{}{}{}",
            "  ".repeat(visit.depth),
            label,
            describe(visit.node)
        );
    }

    let (left, right) = tree.leg_sizes();
    println!(
        "placed={} depth={} left={} right={}",
        tree.node_count(),
        tree.depth(),
        left,
        right
    );
    Ok(())
}

fn run_find(network: &NetworkArgs, root_id: &str, query: &str, all: bool) -> Result<()> {
    // Reject a blank query before touching the store.
    let query = SearchQuery::new(query).context("cannot search")?;
    let tree = build(network, root_id)?;

    let matches: Vec<&NetworkMember> = if all {
        tree.iter().filter(|node| query.matches(node)).collect()
    } else {
        find_with(&tree, &query).into_iter().collect()
    };

    if matches.is_empty() {
        println!("No member found matching '{}'.", query.as_str());
    } else {
        for node in matches {
            println!("{}", describe(node));
        }
    }
    Ok(())
}

fn run_stats(network: &NetworkArgs, member_id: &str) -> Result<()> {
    let members = network.load()?;
    let member = lookup(&members, member_id)?;
    let calculator = StatsCalculator::new(&members, network.sponsor_matching);
    let stats = calculator.stats(member);

    println!(
        "{}\tdirect={}\tteam={}\tactive_team={}",
        describe_member(member),
        stats.direct_referrals,
        stats.team_size,
        stats.active_team
    );
    Ok(())
}

fn describe(node: &NetworkMember) -> String {
    format!(
        "{} ({}) code={}{}",
        node.name,
        node.id,
        if node.referral_code.is_empty() {
            "-"
        } else {
            node.referral_code.as_str()
        },
        if node.active { "" } else { " inactive" }
    )
}

fn describe_member(member: &Member) -> String {
    format!("{} ({})", member.name, member.id)
}
