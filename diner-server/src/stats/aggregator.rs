//! Stats aggregator
//!
//! Read-only. Each operation works on one [`StatsSnapshot`], so users,
//! menu and payments always come from the same state. Category totals
//! resolve each payment's menu item references against the menu in that
//! snapshot; references that no longer resolve are skipped.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use rust_decimal::{Decimal, RoundingStrategy};
use shared::models::{AdminStats, CategoryStat, MenuItem, Payment};

use crate::db::repository::{StatsSnapshot, StatsSource};
use crate::utils::AppResult;

/// Currency display precision
const DECIMAL_PLACES: u32 = 2;

/// Round to 2 decimal places, half away from zero
fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

pub struct StatsAggregator {
    source: Arc<dyn StatsSource>,
}

impl StatsAggregator {
    pub fn new(source: Arc<dyn StatsSource>) -> Self {
        Self { source }
    }

    /// `{users, menus, orders, revenue}`
    pub async fn admin_stats(&self) -> AppResult<AdminStats> {
        let snapshot = self.source.snapshot().await?;
        Ok(summarize(&snapshot))
    }

    /// Per-category totals, sorted by category name
    pub async fn order_stats_by_category(&self) -> AppResult<Vec<CategoryStat>> {
        let snapshot = self.source.snapshot().await?;
        Ok(category_breakdown(&snapshot.menu, &snapshot.payments))
    }
}

fn summarize(snapshot: &StatsSnapshot) -> AdminStats {
    let revenue: Decimal = snapshot.payments.iter().map(|p| p.price).sum();
    AdminStats {
        users: snapshot.users,
        menus: snapshot.menu.len() as u64,
        orders: snapshot.payments.len() as u64,
        revenue: round_money(revenue),
    }
}

fn category_breakdown(menu: &[MenuItem], payments: &[Payment]) -> Vec<CategoryStat> {
    let by_id: HashMap<&str, &MenuItem> = menu.iter().map(|m| (m.id.as_str(), m)).collect();

    let mut totals: BTreeMap<&str, (Decimal, u64)> = BTreeMap::new();
    let mut unresolved = 0usize;
    for payment in payments {
        for item_id in &payment.menu_items {
            let Some(item) = by_id.get(item_id.as_str()) else {
                unresolved += 1;
                continue;
            };
            let entry = totals.entry(item.category.as_str()).or_default();
            entry.0 += item.price;
            entry.1 += 1;
        }
    }
    if unresolved > 0 {
        tracing::debug!(unresolved, "Skipped menu references missing from the catalog");
    }

    totals
        .into_iter()
        .filter(|(_, (_, count))| *count > 0)
        .map(|(category, (total, item_count))| CategoryStat {
            category: category.to_string(),
            total: round_money(total),
            item_count,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::{MemoryStore, MenuCatalog, PaymentLedger, UserDirectory};
    use shared::models::UserCreate;

    fn item(id: &str, category: &str, price: Decimal) -> MenuItem {
        MenuItem {
            id: id.into(),
            name: id.into(),
            recipe: None,
            image: None,
            category: category.into(),
            price,
        }
    }

    fn payment(price: Decimal, menu_items: &[&str]) -> Payment {
        Payment {
            id: shared::util::new_id(),
            user_email: "a@x.io".into(),
            transaction_id: "pi".into(),
            price,
            quantity: menu_items.len() as u32,
            cart_items: vec![],
            menu_items: menu_items.iter().map(|s| s.to_string()).collect(),
            status: None,
            date: String::new(),
            created_at: 0,
        }
    }

    #[test]
    fn test_breakdown_groups_and_skips_unresolved() {
        let menu = vec![
            item("burger", "mains", Decimal::new(10, 0)),
            item("steak", "mains", Decimal::new(2499, 2)),
            item("soda", "drinks", Decimal::new(5, 0)),
            item("cake", "dessert", Decimal::new(6, 0)),
        ];
        let payments = vec![
            payment(Decimal::new(10, 0), &["burger", "ghost"]),
            payment(Decimal::new(5, 0), &["soda"]),
            payment(Decimal::new(3499, 2), &["burger", "steak"]),
        ];

        let stats = category_breakdown(&menu, &payments);
        assert_eq!(
            stats,
            vec![
                CategoryStat {
                    category: "drinks".into(),
                    total: Decimal::new(5, 0),
                    item_count: 1,
                },
                CategoryStat {
                    category: "mains".into(),
                    total: Decimal::new(4499, 2),
                    item_count: 3,
                },
            ]
        );
    }

    #[test]
    fn test_round_money_half_away_from_zero() {
        assert_eq!(round_money(Decimal::new(1005, 3)), Decimal::new(101, 2));
        assert_eq!(round_money(Decimal::new(-1005, 3)), Decimal::new(-101, 2));
        assert_eq!(round_money(Decimal::new(1004, 3)), Decimal::new(100, 2));
    }

    #[tokio::test]
    async fn test_admin_stats_on_empty_ledger() {
        let store = Arc::new(MemoryStore::new());
        let stats = StatsAggregator::new(store.clone());
        let admin = stats.admin_stats().await.unwrap();
        assert_eq!(admin.orders, 0);
        assert_eq!(admin.revenue, Decimal::ZERO);
        assert!(stats.order_stats_by_category().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_admin_stats_counts() {
        let store = Arc::new(MemoryStore::new());
        MenuCatalog::insert(&*store, item("burger", "mains", Decimal::new(10, 0)))
            .await
            .unwrap();
        UserDirectory::insert(
            &*store,
            UserCreate {
                name: None,
                email: "a@x.io".into(),
                photo: None,
            },
        )
        .await
        .unwrap();
        store.settle(payment(Decimal::new(10, 0), &["burger"])).await.unwrap();
        store.settle(payment(Decimal::new(5, 0), &[])).await.unwrap();

        let stats = StatsAggregator::new(store.clone());
        let admin = stats.admin_stats().await.unwrap();
        assert_eq!(admin.users, 1);
        assert_eq!(admin.menus, 1);
        assert_eq!(admin.orders, 2);
        assert_eq!(admin.revenue, Decimal::new(15, 0));
    }

    #[test]
    fn test_summary_and_breakdown_share_one_snapshot() {
        // the payment references an item present only in this snapshot
        let snapshot = StatsSnapshot {
            users: 3,
            menu: vec![item("special", "mains", Decimal::new(12, 0))],
            payments: vec![payment(Decimal::new(12, 0), &["special"])],
        };
        let admin = summarize(&snapshot);
        assert_eq!(admin.users, 3);
        assert_eq!(admin.menus, 1);
        assert_eq!(admin.orders, 1);
        assert_eq!(admin.revenue, Decimal::new(12, 0));

        let breakdown = category_breakdown(&snapshot.menu, &snapshot.payments);
        assert_eq!(breakdown.len(), 1);
        assert_eq!(breakdown[0].total, admin.revenue);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_stats_never_mix_two_states() {
        let store = Arc::new(MemoryStore::new());
        let stats = StatsAggregator::new(store.clone());

        // every payment references a menu item inserted just before it
        let writer = {
            let store = store.clone();
            tokio::spawn(async move {
                for i in 0..200 {
                    let id = format!("m{i}");
                    MenuCatalog::insert(&*store, item(&id, "mains", Decimal::ONE))
                        .await
                        .unwrap();
                    store.settle(payment(Decimal::ONE, &[id.as_str()])).await.unwrap();
                    tokio::task::yield_now().await;
                }
            })
        };

        while !writer.is_finished() {
            let admin = stats.admin_stats().await.unwrap();
            assert!(admin.orders <= admin.menus);
            assert_eq!(admin.revenue, Decimal::from(admin.orders));
            tokio::task::yield_now().await;
        }
        writer.await.unwrap();

        let admin = stats.admin_stats().await.unwrap();
        assert_eq!(admin.orders, 200);
        assert_eq!(admin.menus, 200);
        let breakdown = stats.order_stats_by_category().await.unwrap();
        assert_eq!(breakdown[0].item_count, 200);
    }
}
