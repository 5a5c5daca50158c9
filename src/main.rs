use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use flow_editor::{
    CanvasChange, Editor, EditorConfig, FlowDocument, NodeData, NodeKind, Position, StyleEdit,
    ValidatedGraph, PALETTE,
};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "flow_editor", version, about = "Headless flowchart editor engine")]
struct Cli {
    /// Editor configuration file (JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Walk through an editing session on the default flow
    Demo,
    /// Save the default flow to a file
    New { output: PathBuf },
    /// Apply the grid layout to a saved flow
    Layout { input: PathBuf, output: PathBuf },
    /// Report structural issues in a saved flow
    Validate { input: PathBuf },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(format!("flow_editor={}", log_level))
    });
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match &cli.config {
        Some(path) => EditorConfig::load(path)?,
        None => EditorConfig::default(),
    };

    match cli.command {
        Commands::Demo => demo(config),
        Commands::New { output } => {
            Editor::new(config).document().save(&output)?;
            tracing::info!("Saved default flow to {}", output.display());
            Ok(())
        }
        Commands::Layout { input, output } => layout(&input, &output, config),
        Commands::Validate { input } => validate(&input),
    }
}

fn demo(config: EditorConfig) -> Result<()> {
    println!("Flow Editor - Editing Session");
    println!("=============================\n");

    let mut editor = Editor::new(config);
    println!("✓ Opened default flow");
    println!("  Nodes: {}", editor.store().node_count());
    println!("  Edges: {}", editor.store().edge_count());

    let success = editor.add_node(
        NodeKind::Success,
        Position::new(350.0, 450.0),
        NodeData::labeled("Paid"),
    );
    editor.connect("qrcode-1", &success, None)?;
    editor.connect("card-1", &success, None)?;
    println!("\n✓ Added {} and connected both payment paths", success);

    // A drag arrives as one change per frame
    let start = Instant::now();
    for step in 0..20u32 {
        editor.apply_change(
            CanvasChange::Position {
                id: success.clone(),
                position: Position::new(350.0 + f64::from(step) * 5.0, 450.0),
                dragging: step < 19,
            },
            start + Duration::from_millis(u64::from(step) * 16),
        );
    }
    println!("\n✓ Dragged {} (20 frames, 1 history entry)", success);

    editor.select(&success)?;
    editor.edit_selected(PALETTE[2].edit())?;
    editor.edit_selected(StyleEdit::OpacityPercent(80.0))?;
    editor.edit_selected(StyleEdit::Size {
        width: 180.0,
        lock_ratio: true,
    })?;
    if let Some(panel) = editor.style_panel() {
        println!("\n🎨 Styled {}", panel.node_id);
        println!("  └─ Size: {} x {}", panel.style.width, panel.style.height);
        println!("  └─ Opacity: {}%", panel.style.opacity_percent());
    }

    let moved = editor.auto_layout();
    println!("\n✓ Auto layout moved {} nodes", moved);

    editor.undo()?;
    editor.redo()?;
    println!("\n↺ Undo/redo round trip");
    println!("  History entries: {}", editor.history().len());
    println!("  Cursor: {}", editor.history().cursor());

    let result = editor.store().validate();
    println!("\n📊 Flow Structure:");
    println!("  └─ Nodes: {}", editor.store().node_count());
    println!("  └─ Edges: {}", editor.store().edge_count());
    println!("  └─ Events logged: {}", editor.store().events().len());
    println!("  └─ Issues: {}", result.issues.len());

    for notice in editor.drain_notices() {
        println!("  [{:?}] {}", notice.level, notice.message);
    }

    Ok(())
}

fn layout(input: &Path, output: &Path, config: EditorConfig) -> Result<()> {
    let document = FlowDocument::load(input)?;
    let mut editor = Editor::open(document, config);
    let moved = editor.auto_layout();
    editor
        .document()
        .save(output)
        .with_context(|| format!("Failed to save laid out flow to {}", output.display()))?;
    tracing::info!(moved, "layout written to {}", output.display());
    Ok(())
}

fn validate(input: &Path) -> Result<()> {
    let store = FlowDocument::load(input)?.into_store();
    let result = store.validate();

    for issue in &result.issues {
        println!("[{:?}] {}", issue.severity, issue.message);
    }
    println!(
        "{} error(s), {} warning(s)",
        result.errors().len(),
        result.warnings().len()
    );

    if !result.is_valid() {
        anyhow::bail!("{} is not a valid flow", input.display());
    }
    Ok(())
}
