//! Day lifecycle command handlers: start, summary and close.

use crate::args::{CloseArgs, DateArgs, StartArgs};
use crate::commands::{business_date, Out};
use crate::error::IntoLedgerResult;
use crate::ledger::{Closing, DaySummary};
use crate::model::{Amount, Day};
use crate::{Config, Result};
use std::str::FromStr;
use tracing::warn;

/// Starts the day with the given opening cash.
///
/// # Errors
/// - Returns an error if the opening cash is not positive or the day was already started.
pub async fn start_day(config: Config, args: StartArgs) -> Result<Out<Day>> {
    let date = business_date(&config, args.date());
    let day = config
        .ledger()
        .start_day(date, args.opening_cash())
        .await
        .ledger_result()?;
    let message = format!(
        "Started {} with {} opening cash",
        day.date(),
        day.opening_cash()
    );
    Ok(Out::new(message, day))
}

/// Shows the cash summary of the day. When no day was started the output has no structure and
/// the message says so.
pub async fn summary(config: Config, args: DateArgs) -> Result<Out<DaySummary>> {
    let date = business_date(&config, args.date());
    let summary = config
        .ledger()
        .summarize(date)
        .await
        .ledger_result()?;
    Ok(match summary {
        Some(summary) => Out::new(render_summary(&summary), summary),
        None => Out::new_message(format!(
            "No day has been started for {date}. Start it with 'mototaxi start --opening-cash \
            <amount>'"
        )),
    })
}

/// Closes the day and records the savings withdrawal.
///
/// A savings value that is not a whole, non-negative amount is recorded as 0.
///
/// # Errors
/// - Returns an error if the day was not started or is already closed.
pub async fn close_day(config: Config, args: CloseArgs) -> Result<Out<Closing>> {
    let date = business_date(&config, args.date());
    let savings = args.savings().and_then(|s| match Amount::from_str(s) {
        Ok(amount) => Some(amount.value()),
        Err(e) => {
            warn!("Savings: {e}, recording 0 instead");
            None
        }
    });
    let closing = config
        .ledger()
        .close_day(date, savings)
        .await
        .ledger_result()?;
    let message = format!(
        "Closed {date}\n{}\n  Total before savings  {:>12}\n  Savings               {:>12}\n  \
        Cash after savings    {:>12}",
        render_summary(&closing.summary),
        closing.total_before_savings.to_string(),
        closing.day.savings_withdrawal().to_string(),
        closing.cash_after_savings.to_string(),
    );
    Ok(Out::new(message, closing))
}

fn render_summary(s: &DaySummary) -> String {
    let state = if s.closed { "closed" } else { "open" };
    let rows = [
        ("Opening cash", s.opening_cash),
        ("Ride income", s.real_income),
        ("Credit collected", s.collected_credit),
        ("Total income", s.total_income),
        ("Expenses", s.expenses),
        ("Cash on hand", s.cash_on_hand),
        ("Pending credit", s.pending_credit),
    ];
    let mut out = format!("Summary for {} ({state})", s.date);
    for (label, amount) in rows {
        out.push_str(&format!("\n  {label:<21} {:>12}", amount.to_string()));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DayState;
    use crate::test::{on, ymd, TestEnv};

    #[tokio::test]
    async fn test_start_day() {
        let env = TestEnv::new().await;
        let out = start_day(env.config(), StartArgs::new(Amount::new(20000), on(17)))
            .await
            .unwrap();
        assert_eq!(out.message(), "Started 2026-10-17 with $20.000 opening cash");
        assert_eq!(out.structure().unwrap().opening_cash(), Amount::new(20000));

        let err = start_day(env.config(), StartArgs::new(Amount::new(1), on(17)))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "ledger error");
        assert!(format!("{err:#}").contains("already started"));
    }

    #[tokio::test]
    async fn test_summary_without_day() {
        let env = TestEnv::new().await;
        let out = summary(env.config(), on(17)).await.unwrap();
        assert!(out.structure().is_none());
        assert!(out.message().starts_with("No day has been started for 2026-10-17"));
    }

    #[tokio::test]
    async fn test_summary_message() {
        let env = TestEnv::new().await;
        env.start_day(ymd(17), 20000).await;
        let out = summary(env.config(), on(17)).await.unwrap();
        assert!(out.message().starts_with("Summary for 2026-10-17 (open)"));
        assert!(out.message().contains("$20.000"));
        assert_eq!(out.structure().unwrap().cash_on_hand, Amount::new(20000));
    }

    #[tokio::test]
    async fn test_close_day() {
        let env = TestEnv::new().await;
        env.start_day(ymd(17), 20000).await;
        let out = close_day(env.config(), CloseArgs::new(Some("$5.000".into()), on(17)))
            .await
            .unwrap();
        let closing = out.structure().unwrap();
        assert_eq!(closing.total_before_savings, Amount::new(20000));
        assert_eq!(closing.cash_after_savings, Amount::new(15000));
        assert!(out.message().contains("$15.000"));

        let state = env.config().ledger().day_state(ymd(17)).await.unwrap();
        assert_eq!(state, DayState::Closed);
    }

    #[tokio::test]
    async fn test_close_day_with_unreadable_savings() {
        let env = TestEnv::new().await;
        env.start_day(ymd(17), 1000).await;
        let out = close_day(env.config(), CloseArgs::new(Some("lots".into()), on(17)))
            .await
            .unwrap();
        assert_eq!(
            out.structure().unwrap().day.savings_withdrawal(),
            Amount::ZERO
        );
    }

    #[tokio::test]
    async fn test_close_day_not_started() {
        let env = TestEnv::new().await;
        let err = close_day(env.config(), CloseArgs::new(None, on(17)))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "ledger error");
    }
}
