//! Board Refresh Service - keeps one next-step annotation per card.
//!
//! Every refresh fetches all cards of the board concurrently. A card whose
//! fetch fails keeps whatever annotation it had before; the failure is only
//! logged. Hidden mode clears every annotation without touching the network.

use anyhow::{Context, Result};
use futures_util::future::join_all;
use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, info, warn};

use crate::api::providers::kanban::{BoardProvider, CardRef};
use crate::checklist::{select, AnnotatedStep, Mode, ModeCycle};

/// The rendered next steps of one card
#[derive(Debug, Clone, PartialEq)]
pub struct CardAnnotation {
    pub card: CardRef,
    pub steps: Vec<AnnotatedStep>,
}

/// Result of a refresh pass
#[derive(Debug, Clone, Default)]
pub struct RefreshResult {
    /// Cards whose annotation was rewritten
    pub updated: Vec<String>,
    /// Cards whose annotation was cleared without fetching
    pub cleared: Vec<String>,
    /// Cards whose fetch failed (annotation left unchanged)
    pub failed: Vec<String>,
}

impl RefreshResult {
    /// Check if every card refreshed (no errors)
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    /// Get a summary message
    pub fn summary(&self) -> String {
        format!(
            "Updated: {}, Cleared: {}, Failed: {}",
            self.updated.len(),
            self.cleared.len(),
            self.failed.len()
        )
    }
}

/// Service refreshing the annotations of a board's cards
pub struct BoardRefresher {
    provider: Box<dyn BoardProvider>,
    /// Card ids in board order
    order: Vec<String>,
    annotations: HashMap<String, CardAnnotation>,
}

impl BoardRefresher {
    pub fn new(provider: Box<dyn BoardProvider>) -> Self {
        Self {
            provider,
            order: Vec::new(),
            annotations: HashMap::new(),
        }
    }

    /// Current annotations in board order
    pub fn annotations(&self) -> Vec<CardAnnotation> {
        self.order
            .iter()
            .filter_map(|id| self.annotations.get(id).cloned())
            .collect()
    }

    /// Cards from the last listing, in board order
    pub fn cards(&self) -> Vec<CardRef> {
        self.order
            .iter()
            .filter_map(|id| self.annotations.get(id).map(|a| a.card.clone()))
            .collect()
    }

    /// Steps currently shown for a card
    pub fn steps_for(&self, card_id: &str) -> Option<&[AnnotatedStep]> {
        self.annotations.get(card_id).map(|a| a.steps.as_slice())
    }

    /// List the board's cards and refresh all of them
    pub async fn refresh_board(&mut self, mode: Mode, board: &str) -> Result<RefreshResult> {
        let cards = self
            .provider
            .list_cards(board)
            .await
            .with_context(|| format!("Failed to list cards of board '{}'", board))?;

        debug!(board, count = cards.len(), "Listed board cards");
        Ok(self.refresh(mode, &cards).await)
    }

    /// Like `refresh_board`, but Hidden clears the cards of the last listing
    /// instead of listing the board again
    pub async fn rescan(&mut self, mode: Mode, board: &str) -> Result<RefreshResult> {
        if mode.needs_fetch() {
            return self.refresh_board(mode, board).await;
        }

        let cards = self.cards();
        Ok(self.refresh(mode, &cards).await)
    }

    /// Refresh the given cards under `mode`
    ///
    /// Cards absent from `cards` are forgotten; new cards start empty.
    pub async fn refresh(&mut self, mode: Mode, cards: &[CardRef]) -> RefreshResult {
        self.track(cards);

        let mut result = RefreshResult::default();

        if !mode.needs_fetch() {
            for id in &self.order {
                if let Some(annotation) = self.annotations.get_mut(id) {
                    annotation.steps.clear();
                    result.cleared.push(id.clone());
                }
            }
            info!("Cleared {} card annotations", result.cleared.len());
            return result;
        }

        let provider = self.provider.as_ref();
        let fetches = cards.iter().map(|card| async move {
            let fetched = provider.fetch_checklists(&card.id).await;
            (card, fetched)
        });

        for (card, fetched) in join_all(fetches).await {
            match fetched {
                Ok(payload) => {
                    let steps = select(mode, &payload.checklists);
                    if let Some(annotation) = self.annotations.get_mut(&card.id) {
                        annotation.steps = steps;
                    }
                    result.updated.push(card.id.clone());
                }
                Err(e) => {
                    warn!(
                        card = %card.id,
                        provider = e.provider_name(),
                        error = %e,
                        "Failed to fetch card checklists"
                    );
                    result.failed.push(card.id.clone());
                }
            }
        }

        info!(mode = %mode, "Refresh complete: {}", result.summary());
        result
    }

    /// Re-scan `board` every `interval` until `shutdown` resolves
    ///
    /// Each line read from `input` advances `cycle` and triggers an immediate
    /// re-scan. `redraw` is called after every successful scan. `shutdown` is
    /// also watched while a scan is in flight.
    pub async fn watch<R, S, F>(
        &mut self,
        board: &str,
        cycle: &mut ModeCycle,
        interval: Duration,
        input: R,
        shutdown: S,
        mut redraw: F,
    ) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        S: Future<Output = ()>,
        F: FnMut(Mode, &[CardAnnotation]),
    {
        let mut ticker = tokio::time::interval(interval);
        let mut lines = input.lines();
        let mut input_open = true;
        tokio::pin!(shutdown);

        info!(board, interval_secs = interval.as_secs(), "Watching board");

        loop {
            tokio::select! {
                _ = ticker.tick() => {}
                line = lines.next_line(), if input_open => {
                    if line.context("Failed to read input")?.is_some() {
                        let mode = cycle.advance();
                        info!(mode = %mode, "Mode changed");
                        ticker.reset();
                    } else {
                        input_open = false;
                        continue;
                    }
                }
                _ = &mut shutdown => break,
            }

            let mode = cycle.current();
            tokio::select! {
                scanned = self.rescan(mode, board) => match scanned {
                    Ok(_) => redraw(mode, &self.annotations()),
                    Err(e) => warn!("Board refresh failed: {:#}", e),
                },
                _ = &mut shutdown => break,
            }
        }

        info!(board, "Stopped watching board");
        Ok(())
    }

    fn track(&mut self, cards: &[CardRef]) {
        self.order = cards.iter().map(|c| c.id.clone()).collect();
        self.annotations
            .retain(|id, _| cards.iter().any(|c| &c.id == id));

        for card in cards {
            self.annotations
                .entry(card.id.clone())
                .and_modify(|a| a.card = card.clone())
                .or_insert_with(|| CardAnnotation {
                    card: card.clone(),
                    steps: Vec::new(),
                });
        }
    }
}
