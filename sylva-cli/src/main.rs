//! Sylva CLI
//!
//! Loads a JSON tree fixture and runs tree queries and validated mutations
//! against it.
//!
//! - sylva tree fixture.json                 # Print every fixture root
//! - sylva insert fixture.json body p -v     # Insert with debug logging

mod fixture;

use std::cmp::Ordering;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use owo_colors::OwoColorize;
use sylva_dom::{DEFAULT_MAX_DEPTH, NodeId, NodeKind, NodeType};
use tracing_subscriber::EnvFilter;

use fixture::Fixture;

/// Sylva: inspect and mutate DOM tree fixtures
#[derive(Parser, Debug)]
#[command(name = "sylva")]
#[command(author, version, about, long_about = None)]
#[command(after_help = r#"EXAMPLES:
    # Print the fixture trees
    sylva tree page.json

    # Tree order of two labelled nodes
    sylva order page.json title footer

    # First text node at most 3 levels below `body`
    sylva find page.json body text --max-depth 3

    # Move `item` before `first`, logging each step
    sylva -vv insert page.json list item --before first

    # Nodes without a label are addressed by id
    sylva remove page.json '#0' '#4'
"#)]
struct Cli {
    /// Raise the log level (-v debug, -vv trace); overrides RUST_LOG
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build the fixture and print every root
    Tree {
        /// Path to the JSON fixture
        file: PathBuf,
    },
    /// Report the tree order of two nodes
    Order {
        /// Path to the JSON fixture
        file: PathBuf,
        /// First node (label or #id)
        a: String,
        /// Second node (label or #id)
        b: String,
    },
    /// Find the first descendant of a given kind
    Find {
        /// Path to the JSON fixture
        file: PathBuf,
        /// Node to search below (label or #id)
        from: String,
        /// Node kind, e.g. element, text, doctype, document-fragment
        kind: NodeKind,
        /// Levels to search below the direct children
        #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
        max_depth: usize,
    },
    /// Insert a node into a parent, optionally before a reference child
    Insert {
        /// Path to the JSON fixture
        file: PathBuf,
        /// New parent (label or #id)
        parent: String,
        /// Node to insert (label or #id)
        node: String,
        /// Reference child; append when omitted
        #[arg(long, value_name = "REF")]
        before: Option<String>,
    },
    /// Remove a child from its parent
    Remove {
        /// Path to the JSON fixture
        file: PathBuf,
        /// Parent (label or #id)
        parent: String,
        /// Child to remove (label or #id)
        child: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Tree { file } => {
            let fixture = Fixture::load(&file)?;
            for &root in &fixture.roots {
                print_tree(&fixture, root);
            }
        }
        Command::Order { file, a, b } => {
            let fixture = Fixture::load(&file)?;
            let (x, y) = (fixture.resolve(&a)?, fixture.resolve(&b)?);
            let relation = match fixture.tree.compare_tree_order(x, y) {
                Some(Ordering::Less) => "precedes",
                Some(Ordering::Greater) => "follows",
                Some(Ordering::Equal) => "is the same node as",
                None => "is in a different tree from",
            };
            println!("{a} {relation} {b}");
        }
        Command::Find {
            file,
            from,
            kind,
            max_depth,
        } => {
            let fixture = Fixture::load(&file)?;
            let from_id = fixture.resolve(&from)?;
            match fixture
                .tree
                .find_descendant(from_id, |n| n.kind() == kind, max_depth)
            {
                Some(found) => println!("{}", describe(&fixture, found)),
                None => println!(
                    "{}",
                    format!("no {kind} within {max_depth} levels below {from}").dimmed()
                ),
            }
        }
        Command::Insert {
            file,
            parent,
            node,
            before,
        } => {
            let mut fixture = Fixture::load(&file)?;
            let parent_id = fixture.resolve(&parent)?;
            let node_id = fixture.resolve(&node)?;
            let child_id = before.as_deref().map(|r| fixture.resolve(r)).transpose()?;
            let _ = fixture
                .tree
                .pre_insert(parent_id, node_id, child_id)
                .with_context(|| format!("cannot insert {node} into {parent}"))?;
            print_tree(&fixture, fixture.tree.root(parent_id));
        }
        Command::Remove {
            file,
            parent,
            child,
        } => {
            let mut fixture = Fixture::load(&file)?;
            let parent_id = fixture.resolve(&parent)?;
            let child_id = fixture.resolve(&child)?;
            let removed = fixture
                .tree
                .pre_remove(parent_id, child_id)
                .with_context(|| format!("cannot remove {child} from {parent}"))?;
            print_tree(&fixture, fixture.tree.root(parent_id));
            println!("\n{}", "removed:".bold());
            print_tree(&fixture, removed);
        }
    }

    Ok(())
}

/// Install the stderr log subscriber. `-v` flags win over `RUST_LOG`.
fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

/// Print the subtree rooted at `root`, one node per line.
fn print_tree(fixture: &Fixture, root: NodeId) {
    let mut stack = vec![(root, 0)];
    while let Some((id, depth)) = stack.pop() {
        println!("{}{}", "  ".repeat(depth), describe(fixture, id));
        for &child in fixture.tree.children(id).iter().rev() {
            stack.push((child, depth + 1));
        }
    }
}

/// One-line rendering of a node: its markup-like form, id, and label.
fn describe(fixture: &Fixture, id: NodeId) -> String {
    let tree = &fixture.tree;
    let Some(node) = tree.get(id) else {
        return format!("{id} (missing)");
    };

    let body = match &node.node_type {
        NodeType::Document => "Document".bold().to_string(),
        NodeType::DocumentFragment => {
            let host = tree
                .host(id)
                .map(|host| format!(" (host {host})"))
                .unwrap_or_default();
            format!("#document-fragment{host}").bold().to_string()
        }
        NodeType::DocumentType(data) => format!("<!DOCTYPE {}>", data.name).dimmed().to_string(),
        NodeType::Element(data) => format!("<{}>", data.tag_name).cyan().to_string(),
        NodeType::Text(data) => {
            let display = data.replace('\n', "\\n").replace(' ', "\u{00B7}");
            format!("\"{display}\"").green().to_string()
        }
        NodeType::CdataSection(data) => format!("<![CDATA[{data}]]>").green().to_string(),
        NodeType::Comment(data) => format!("<!-- {data} -->").dimmed().to_string(),
        NodeType::ProcessingInstruction(data) => {
            format!("<?{} {}?>", data.target, data.data).magenta().to_string()
        }
    };

    let mut line = format!("{body} {}", id.to_string().dimmed());
    if let Some(label) = fixture.label_of(id) {
        line.push_str(&format!(" {}", format!("[{label}]").yellow()));
    }
    if node.is_read_only() {
        line.push_str(&format!(" {}", "(read-only)".red()));
    }
    line
}
