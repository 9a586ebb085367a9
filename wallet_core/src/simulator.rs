//! Demo mode: sends that never leave the process.
//!
//! The executor owns an in-memory projection seeded from [`DemoConfig`].
//! Confirmed simulated sends are subtracted from it cumulatively and
//! prepended to its activity list. No key material, storage or network
//! client is reachable from here.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use pocket_types::{AccountAddress, AssetKind, Clock, Timestamp};

use crate::account::AccountSnapshot;
use crate::config::DemoConfig;
use crate::payment::ValidatedPayment;
use crate::receipt::{Receipt, TransactionSummary};

const SECS_PER_DAY: u64 = 24 * 60 * 60;

/// Fixture activity: memo and age in days.
const DEMO_HISTORY: [(&str, u64); 3] = [
    ("Coffee at Starbucks", 1),
    ("Lunch payment", 2),
    ("Top up from LOBSTR", 3),
];

/// Placeholder address shown in demo mode. It deliberately fails the
/// account-id checksum so it can never be paid for real.
pub fn demo_address() -> AccountAddress {
    AccountAddress::new(format!("DEMO_G{}", "A".repeat(55)))
}

fn to_datetime(ts: Timestamp) -> DateTime<Utc> {
    i64::try_from(ts.as_secs())
        .ok()
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .unwrap_or_default()
}

pub struct SimulatedExecutor {
    snapshot: AccountSnapshot,
    delay: Duration,
    clock: Arc<dyn Clock>,
    sent: u64,
}

impl SimulatedExecutor {
    pub fn new(config: &DemoConfig, clock: Arc<dyn Clock>) -> Self {
        let now = clock.now();
        let recent_transactions = DEMO_HISTORY
            .iter()
            .enumerate()
            .map(|(i, &(memo, days))| TransactionSummary {
                id: format!("demo-{}", i + 1),
                created_at: to_datetime(now.minus_secs(days * SECS_PER_DAY)),
                memo: Some(memo.to_string()),
                successful: true,
            })
            .collect();

        let snapshot = AccountSnapshot {
            address: demo_address(),
            exists: true,
            native_balance: config.native_balance,
            issued_balance: Some(config.issued_balance),
            has_issued_trustline: true,
            trustline_count: 1,
            subentry_count: 1,
            recent_transactions,
        };

        Self {
            snapshot,
            delay: config.delay(),
            clock,
            sent: 0,
        }
    }

    pub fn snapshot(&self) -> &AccountSnapshot {
        &self.snapshot
    }

    /// Number of simulated sends so far.
    pub fn sent(&self) -> u64 {
        self.sent
    }

    /// Wait out the artificial delay, then apply `payment` to the projection.
    pub async fn execute(&mut self, payment: &ValidatedPayment) -> Receipt {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        match payment.asset {
            AssetKind::Native => {
                self.snapshot.native_balance = self.snapshot.native_balance.saturating_sub(payment.amount);
            }
            AssetKind::Issued => {
                let held = self.snapshot.balance_of(AssetKind::Issued);
                self.snapshot.issued_balance = Some(held.saturating_sub(payment.amount));
            }
        }

        self.sent += 1;
        let id = hex::encode(pocket_crypto::sha256(
            format!(
                "demo:{}:{}:{}:{}",
                self.sent,
                payment.destination,
                payment.amount,
                payment.asset.code()
            )
            .as_bytes(),
        ));
        let now = self.clock.now();

        self.snapshot.recent_transactions.insert(
            0,
            TransactionSummary {
                id: id.clone(),
                created_at: to_datetime(now),
                memo: payment.memo.as_text().map(str::to_string),
                successful: true,
            },
        );

        tracing::info!(
            amount = %payment.amount,
            asset = payment.asset.code(),
            remaining = %self.snapshot.balance_of(payment.asset),
            "simulated payment confirmed"
        );

        Receipt {
            id,
            ledger: 0,
            confirmed_at: now,
            simulated: true,
        }
    }
}
