//! Koyomi CLI: a timeline view over a JSON board file.
//!
//! Usage:
//!   koyomi-cli board.json                         # show the timeline
//!   koyomi-cli board.json move launch --from 0 --to 86400000 --group Ops
//!   koyomi-cli board.json delete c1f3 --save
//!   koyomi-cli board.json add --from 0 --to 3600000
//!   koyomi-cli board.json open launch
//!
//! Edits go through the same widget event path a GUI would use. The board is
//! only written back with `--save`.

mod board;
mod logging;

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use koyomi_timeline::{
    ClickEvent, ClickTarget, HeadlessWidget, MovedItem, PointerEvent, ProposedItem, TimelineView,
    WidgetEvent, load_config, load_config_from,
};
use koyomi_types::{Record, RecordId, resolve_record_prefix};
use tracing::{info, warn};

use crate::board::{Board, MemoryBoard};

/// Timeline view over a board file.
#[derive(Parser, Debug)]
#[command(name = "koyomi-cli")]
#[command(about = "Show and edit a board's cards on a timeline")]
struct Args {
    /// Board JSON file (`cardProperties` + `cards`)
    board: PathBuf,

    /// Timeline config (RON); defaults to ~/.config/koyomi/timeline.ron
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the board back after an edit
    #[arg(long)]
    save: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print lanes and items
    Show,
    /// Move a card to a new span (and optionally a new lane)
    Move {
        /// Card ID, ID prefix, or exact title
        card: String,
        /// Start, Unix millis
        #[arg(long, allow_hyphen_values = true)]
        from: i64,
        /// End, Unix millis
        #[arg(long, allow_hyphen_values = true)]
        to: i64,
        /// Target lane; empty string for unassigned. Keeps the current lane if omitted.
        #[arg(long)]
        group: Option<String>,
    },
    /// Delete a card
    Delete {
        card: String,
    },
    /// Create a card from a span drawn on the timeline
    Add {
        #[arg(long, allow_hyphen_values = true)]
        from: i64,
        #[arg(long, allow_hyphen_values = true)]
        to: i64,
        #[arg(long)]
        group: Option<String>,
    },
    /// Open a card (double-click) and print it as JSON
    Open {
        card: String,
    },
}

fn main() -> Result<()> {
    let _guard = logging::init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config_from(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => load_config(),
    };

    let board = Board::load(&args.board)?;
    let mut store = MemoryBoard::new(board);
    let mut view = TimelineView::mount(HeadlessWidget::factory, config)?;

    let (schema, records) = store.snapshot();
    let outcome = view.render(&schema, &records)?;
    if !outcome.is_displayable() {
        println!("No date property found");
        return Ok(());
    }

    let event = match args.command.unwrap_or(Command::Show) {
        Command::Show => {
            print_timeline(&view);
            return Ok(());
        }
        Command::Move {
            card,
            from,
            to,
            group,
        } => {
            let id = resolve_card(store.cards(), &card)?;
            let Some(item) = view.dataset().get(&id) else {
                bail!("card {} is not on the timeline (no complete date)", id.short());
            };
            let group = group.unwrap_or_else(|| item.group.clone());
            WidgetEvent::Move(MovedItem::from_item(item, from, to, group))
        }
        Command::Delete { card } => WidgetEvent::Remove {
            id: resolve_card(store.cards(), &card)?,
        },
        Command::Add { from, to, group } => WidgetEvent::Add(ProposedItem {
            start: from,
            end: to,
            group,
        }),
        Command::Open { card } => WidgetEvent::DoubleClick(ClickEvent {
            target: Some(ClickTarget::Item),
            item: Some(resolve_card(store.cards(), &card)?),
            pointer: PointerEvent::default(),
        }),
    };

    if let Some(activation) = view.dispatch(&event, &mut store) {
        println!("{}", serde_json::to_string_pretty(&activation.record)?);
        return Ok(());
    }

    if !store.is_dirty() {
        warn!(event = event.as_str(), "event produced no change");
        print_timeline(&view);
        return Ok(());
    }

    let (schema, records) = store.snapshot();
    view.render(&schema, &records)?;
    print_timeline(&view);
    if let Some(card) = store.opened() {
        println!("{}", serde_json::to_string_pretty(card)?);
    }

    if args.save {
        let changes = store.broadcasts().len();
        store.into_board().save(&args.board)?;
        info!(changes, board = %args.board.display(), "board saved");
    }
    Ok(())
}

fn resolve_card(cards: &[Record], query: &str) -> Result<RecordId> {
    let query = RecordId::parse(query).context("card argument")?;
    let id = resolve_record_prefix(
        cards.iter().map(|c| (&c.id, Some(c.title.as_str()))),
        query.as_str(),
    )?;
    Ok(id)
}

fn print_timeline(view: &TimelineView<HeadlessWidget>) {
    let Some(widget) = view.widget() else {
        return;
    };
    for group in widget.groups() {
        let items: Vec<_> = widget
            .drawn_items()
            .filter(|(_, drawn)| drawn.group == group.id)
            .collect();
        if items.is_empty() && !group.is_unassigned() {
            continue;
        }
        println!("{}", group.content);
        for (id, drawn) in items {
            println!(
                "  {:<8}  {:>15} .. {:<15}  {}",
                id.short(),
                drawn.start,
                drawn.end,
                drawn.label
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cards() -> Vec<Record> {
        vec![Record::new("c1f3a9", "Launch"), Record::new("c2", "Review")]
    }

    #[test]
    fn test_resolve_card_by_title_and_prefix() {
        assert_eq!(resolve_card(&cards(), "Review").unwrap(), RecordId::from("c2"));
        assert_eq!(resolve_card(&cards(), " c1f ").unwrap(), RecordId::from("c1f3a9"));
    }

    #[test]
    fn test_resolve_card_rejects_blank() {
        let err = resolve_card(&cards(), "   ").unwrap_err();
        assert!(err.to_string().contains("card argument"));
    }
}
