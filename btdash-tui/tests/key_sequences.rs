//! Random key sequences never break the app's paging and scroll bounds.

use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use proptest::prelude::*;

use btdash_core::domain::{
    BacktestResponse, BacktestRun, DecisionPage, DecisionRecord, Metrics, TradeRecord,
};
use btdash_core::DashboardConfig;
use btdash_tui::app::AppState;
use btdash_tui::input;
use btdash_tui::worker::WorkerCommand;

/// The command receiver is returned so requests keep succeeding.
fn loaded_app(trades: usize, decisions: usize) -> (AppState, Receiver<WorkerCommand>) {
    let (cmd_tx, cmd_rx) = mpsc::channel();
    let (_resp_tx, resp_rx) = mpsc::channel();
    let mut app = AppState::new(
        DashboardConfig::default(),
        cmd_tx,
        resp_rx,
        PathBuf::from("state.json"),
    );

    app.request_backtest();
    let ticket = app.pending_run.expect("ticket issued");
    let response: BacktestResponse = BacktestRun {
        metrics: Metrics::default(),
        trades: (0..trades)
            .map(|i| TradeRecord {
                side: "long".into(),
                pnl: Some(i as f64 - 3.0),
                ..Default::default()
            })
            .collect(),
        curve: Vec::new(),
    }
    .into();
    app.apply_backtest(ticket, Ok(response));

    let page = DecisionPage {
        total: Some(decisions as u64),
        data: (0..decisions.min(10))
            .map(|i| DecisionRecord {
                timestamp: Some(format!("t{i}")),
                ..Default::default()
            })
            .collect(),
        ..Default::default()
    };
    let query = app.history.query();
    app.apply_history(query, Ok(page));
    (app, cmd_rx)
}

fn arb_key() -> impl Strategy<Value = KeyCode> {
    prop_oneof![
        Just(KeyCode::Char('1')),
        Just(KeyCode::Char('2')),
        Just(KeyCode::Char('4')),
        Just(KeyCode::Tab),
        Just(KeyCode::BackTab),
        Just(KeyCode::Char('n')),
        Just(KeyCode::Char('p')),
        Just(KeyCode::Right),
        Just(KeyCode::Left),
        Just(KeyCode::Char('+')),
        Just(KeyCode::Char('-')),
        Just(KeyCode::Char('j')),
        Just(KeyCode::Char('k')),
        Just(KeyCode::Enter),
        Just(KeyCode::Esc),
        Just(KeyCode::Char('7')),
    ]
}

proptest! {
    #[test]
    fn bounds_hold_under_any_key_sequence(
        trades in 0usize..120,
        decisions in 0usize..60,
        keys in prop::collection::vec(arb_key(), 0..80),
    ) {
        let (mut app, _cmd_rx) = loaded_app(trades, decisions);
        for code in keys {
            input::handle_key(&mut app, KeyEvent::new(code, KeyModifiers::NONE));
            // Leave any edit so navigation keys keep flowing.
            if app.editing.is_some() && code == KeyCode::Enter {
                app.cancel_edit();
            }

            let tp = app.controller.trade_pages();
            prop_assert!(tp.page() >= 1 && tp.page() <= tp.max_page());
            let hp = app.history.pages();
            prop_assert!(hp.page() >= 1 && hp.page() <= hp.max_page());
            prop_assert!(app.history_scroll <= app.history.records().len().saturating_sub(1));
            prop_assert!(app.controller.page_rows().len() <= tp.page_size());
        }
        prop_assert!(app.running);
    }
}
