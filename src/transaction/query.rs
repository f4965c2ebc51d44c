//! Filtered list queries over the income and expense tables.

use std::ops::RangeInclusive;

use rusqlite::Connection;
use time::Date;

use crate::{Error, UserId};

use super::core::{Transaction, TransactionKind, map_transaction_row};

/// The order to sort transactions in a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SortOrder {
    /// Sort by date in order of increasing value.
    Ascending,
    /// Sort by date in order of decreasing value.
    Descending,
}

/// Defines which of a user's transactions a list query returns.
///
/// The default filter matches everything.
#[derive(Debug, Clone, Default)]
pub(crate) struct TransactionFilter {
    /// Include transactions within `date_range` (inclusive on both ends;
    /// the whole end day is included since dates carry no time of day).
    pub date_range: Option<RangeInclusive<Date>>,
    /// Include only transactions with this category. `None` matches all.
    pub category: Option<String>,
}

/// Retrieve the user's transactions matching `filter`, sorted by date.
///
/// Ties on the date are broken by record ID so the order is stable across
/// reads.
///
/// # Errors
/// Returns [Error::SqlError] if the query fails.
pub(crate) fn get_transactions(
    kind: TransactionKind,
    user_id: UserId,
    filter: &TransactionFilter,
    sort_order: SortOrder,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    let order_clause = match sort_order {
        SortOrder::Ascending => "ORDER BY date ASC, id ASC",
        SortOrder::Descending => "ORDER BY date DESC, id ASC",
    };

    let query = format!(
        "SELECT id, user_id, amount, date, description, tag, tax_rate, tax_amount
         FROM {}
         WHERE user_id = :user_id
           AND (:start IS NULL OR date >= :start)
           AND (:end IS NULL OR date <= :end)
           AND (:category IS NULL OR tag = :category)
         {}",
        kind.table_name(),
        order_clause
    );

    let start = filter.date_range.as_ref().map(|range| *range.start());
    let end = filter.date_range.as_ref().map(|range| *range.end());

    connection
        .prepare(&query)?
        .query_map(
            rusqlite::named_params! {
                ":user_id": user_id,
                ":start": start,
                ":end": end,
                ":category": filter.category,
            },
            map_transaction_row,
        )?
        .map(|transaction_result| transaction_result.map_err(|error| error.into()))
        .collect()
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        db::initialize,
        transaction::{TransactionData, TransactionKind, create_transaction},
    };

    use super::{SortOrder, TransactionFilter, get_transactions};

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    fn record(amount: f64, date: time::Date, tag: &str) -> TransactionData {
        TransactionData {
            amount,
            date,
            description: String::new(),
            tag: tag.to_owned(),
            tax_rate: None,
        }
    }

    #[test]
    fn returns_all_transactions_with_default_filter() {
        let conn = get_test_connection();
        for day in 1..=5u8 {
            create_transaction(
                TransactionKind::Income,
                1,
                record(f64::from(day), date!(2025 - 04 - 01).replace_day(day).unwrap(), "Sales"),
                &conn,
            )
            .unwrap();
        }

        let got = get_transactions(
            TransactionKind::Income,
            1,
            &TransactionFilter::default(),
            SortOrder::Ascending,
            &conn,
        )
        .unwrap();

        assert_eq!(got.len(), 5);
    }

    #[test]
    fn date_range_includes_both_endpoints() {
        let conn = get_test_connection();
        for day in [date!(2025 - 04 - 01), date!(2025 - 04 - 10), date!(2025 - 04 - 11)] {
            create_transaction(TransactionKind::Income, 1, record(1.0, day, "Sales"), &conn)
                .unwrap();
        }

        let filter = TransactionFilter {
            date_range: Some(date!(2025 - 04 - 01)..=date!(2025 - 04 - 10)),
            category: None,
        };
        let got =
            get_transactions(TransactionKind::Income, 1, &filter, SortOrder::Ascending, &conn)
                .unwrap();

        assert_eq!(got.len(), 2);
        assert_eq!(got[0].date, date!(2025 - 04 - 01));
        assert_eq!(got[1].date, date!(2025 - 04 - 10));
    }

    #[test]
    fn category_filter_matches_exactly() {
        let conn = get_test_connection();
        let day = date!(2025 - 04 - 01);
        create_transaction(TransactionKind::Expense, 1, record(1.0, day, "Rent"), &conn).unwrap();
        create_transaction(TransactionKind::Expense, 1, record(2.0, day, "Parts"), &conn).unwrap();

        let filter = TransactionFilter {
            date_range: None,
            category: Some("Rent".to_owned()),
        };
        let got =
            get_transactions(TransactionKind::Expense, 1, &filter, SortOrder::Ascending, &conn)
                .unwrap();

        assert_eq!(got.len(), 1);
        assert_eq!(got[0].tag, "Rent");
    }

    #[test]
    fn descending_sort_keeps_id_order_within_a_day() {
        let conn = get_test_connection();
        let day = date!(2025 - 04 - 02);
        for amount in [1.0, 2.0, 3.0] {
            create_transaction(TransactionKind::Income, 1, record(amount, day, "Sales"), &conn)
                .unwrap();
        }
        create_transaction(
            TransactionKind::Income,
            1,
            record(9.0, date!(2025 - 04 - 01), "Sales"),
            &conn,
        )
        .unwrap();

        let got = get_transactions(
            TransactionKind::Income,
            1,
            &TransactionFilter::default(),
            SortOrder::Descending,
            &conn,
        )
        .unwrap();

        let amounts: Vec<f64> = got.iter().map(|transaction| transaction.amount).collect();
        assert_eq!(amounts, vec![1.0, 2.0, 3.0, 9.0]);
    }

    #[test]
    fn queries_are_scoped_by_user() {
        let conn = get_test_connection();
        create_transaction(
            TransactionKind::Income,
            1,
            record(1.0, date!(2025 - 04 - 01), "Sales"),
            &conn,
        )
        .unwrap();

        let got = get_transactions(
            TransactionKind::Income,
            2,
            &TransactionFilter::default(),
            SortOrder::Ascending,
            &conn,
        )
        .unwrap();

        assert!(got.is_empty());
    }
}
