use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use super::models::PaymentRecord;

/// One reconciled payment entry: the payment plus the accumulated-paid
/// and remaining-balance annotations as of that row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LedgerRow {
    #[serde(flatten)]
    pub payment: PaymentRecord,

    #[serde(with = "rust_decimal::serde::float")]
    pub accumulated_paid: Decimal,

    #[serde(with = "rust_decimal::serde::float")]
    pub remaining: Decimal,
}

/// Response body for the ledger endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct LedgerResponse {
    #[serde(with = "rust_decimal::serde::float")]
    pub total_amount: Decimal,
    pub data: Vec<LedgerRow>,
    pub count: i64,
}

/// Turn a contract's total and its payments into a running-balance ledger.
///
/// Rows are ordered ascending by `create_time`, the audit timestamp of
/// when each payment was recorded, because that reflects the true order
/// in which money was applied to the balance. `payment_date` is the
/// operator-chosen display date and plays no part in the ordering. A
/// missing `create_time` sorts as the Unix epoch, i.e. before everything
/// else; the sort is stable so equal timestamps keep their input order.
///
/// Pure and idempotent: the input slice is not mutated and calling this
/// twice on the same input yields identical output. Zero amounts are
/// legal and leave the balance unchanged; negative amounts propagate
/// through the arithmetic rather than being silently swallowed, with
/// only `remaining` floored at 0.
pub fn reconcile(total_amount: Decimal, payments: &[PaymentRecord]) -> Vec<LedgerRow> {
    let mut ordered: Vec<&PaymentRecord> = payments.iter().collect();
    ordered.sort_by_key(|payment| payment.create_time.unwrap_or(DateTime::UNIX_EPOCH));

    let mut rows = Vec::with_capacity(ordered.len());
    let mut accumulated_paid = Decimal::ZERO;

    for payment in ordered {
        accumulated_paid += payment.amount;
        let remaining = (total_amount - accumulated_paid).max(Decimal::ZERO);

        rows.push(LedgerRow {
            payment: payment.clone(),
            accumulated_paid,
            remaining,
        });
    }

    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn payment(amount: Decimal, create_time: Option<DateTime<Utc>>) -> PaymentRecord {
        PaymentRecord {
            id: Uuid::new_v4(),
            contract_id: Uuid::nil(),
            amount,
            payment_date: chrono::NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            note: None,
            create_by: None,
            create_time,
        }
    }

    fn at(secs: i64) -> Option<DateTime<Utc>> {
        Some(Utc.timestamp_opt(secs, 0).unwrap())
    }

    #[test]
    fn test_running_balance_over_two_payments() {
        let payments = vec![payment(dec!(300), at(1)), payment(dec!(500), at(2))];
        let rows = reconcile(dec!(1000), &payments);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].accumulated_paid, dec!(300));
        assert_eq!(rows[0].remaining, dec!(700));
        assert_eq!(rows[1].accumulated_paid, dec!(800));
        assert_eq!(rows[1].remaining, dec!(200));
    }

    #[test]
    fn test_orders_by_create_time_not_input_order() {
        let late = payment(dec!(500), at(20));
        let early = payment(dec!(300), at(10));
        let rows = reconcile(dec!(1000), &[late.clone(), early.clone()]);

        assert_eq!(rows[0].payment.id, early.id);
        assert_eq!(rows[1].payment.id, late.id);
        assert_eq!(rows[1].accumulated_paid, dec!(800));
    }

    #[test]
    fn test_missing_create_time_sorts_first() {
        let stamped = payment(dec!(100), at(5));
        let unstamped = payment(dec!(40), None);
        let rows = reconcile(dec!(1000), &[stamped.clone(), unstamped.clone()]);

        assert_eq!(rows[0].payment.id, unstamped.id);
        assert_eq!(rows[0].accumulated_paid, dec!(40));
        assert_eq!(rows[1].accumulated_paid, dec!(140));
    }

    #[test]
    fn test_equal_timestamps_keep_input_order() {
        let first = payment(dec!(10), at(7));
        let second = payment(dec!(20), at(7));
        let rows = reconcile(dec!(100), &[first.clone(), second.clone()]);

        assert_eq!(rows[0].payment.id, first.id);
        assert_eq!(rows[1].payment.id, second.id);
    }

    #[test]
    fn test_overpayment_clamps_remaining_at_zero() {
        let rows = reconcile(dec!(100), &[payment(dec!(150), at(1))]);

        assert_eq!(rows[0].accumulated_paid, dec!(150));
        assert_eq!(rows[0].remaining, Decimal::ZERO);
    }

    #[test]
    fn test_empty_payments_yield_empty_ledger() {
        let rows = reconcile(dec!(1000), &[]);
        assert!(rows.is_empty());
    }

    #[test]
    fn test_zero_amount_leaves_remaining_unchanged() {
        let payments = vec![payment(dec!(250), at(1)), payment(dec!(0), at(2))];
        let rows = reconcile(dec!(1000), &payments);

        assert_eq!(rows[0].remaining, dec!(750));
        assert_eq!(rows[1].remaining, dec!(750));
        assert_eq!(rows[1].accumulated_paid, dec!(250));
    }

    #[test]
    fn test_accumulated_deltas_sum_to_payment_total() {
        let payments = vec![
            payment(dec!(12.34), at(3)),
            payment(dec!(0.66), at(1)),
            payment(dec!(87), at(2)),
        ];
        let rows = reconcile(dec!(500), &payments);

        let last = rows.last().unwrap();
        let total: Decimal = payments.iter().map(|p| p.amount).sum();
        assert_eq!(last.accumulated_paid, total);
    }

    #[test]
    fn test_remaining_is_non_increasing() {
        let payments = vec![
            payment(dec!(100), at(1)),
            payment(dec!(0), at(2)),
            payment(dec!(300), at(3)),
            payment(dec!(700), at(4)),
            payment(dec!(5), at(5)),
        ];
        let rows = reconcile(dec!(1000), &payments);

        for pair in rows.windows(2) {
            assert!(pair[1].remaining <= pair[0].remaining);
        }
        assert_eq!(rows.last().unwrap().remaining, Decimal::ZERO);
    }

    #[test]
    fn test_idempotent_over_identical_input() {
        let payments = vec![
            payment(dec!(300), at(2)),
            payment(dec!(500), None),
            payment(dec!(200), at(1)),
        ];

        let first = reconcile(dec!(1000), &payments);
        let second = reconcile(dec!(1000), &payments);
        assert_eq!(first, second);
    }

    #[test]
    fn test_negative_amount_propagates() {
        let payments = vec![payment(dec!(100), at(1)), payment(dec!(-30), at(2))];
        let rows = reconcile(dec!(1000), &payments);

        assert_eq!(rows[1].accumulated_paid, dec!(70));
        assert_eq!(rows[1].remaining, dec!(930));
    }
}
