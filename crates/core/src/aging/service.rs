//! Aging classification.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tally_shared::types::non_negative;

use super::types::{AgingBucket, AgingRow, OutstandingDocument};

/// Aging service for bucketing outstanding balances by age.
pub struct AgingService;

impl AgingService {
    /// Whole days between the document date and `as_of`, never negative.
    #[must_use]
    pub fn age_in_days(as_of: NaiveDate, date: NaiveDate) -> i64 {
        (as_of - date).num_days().max(0)
    }

    /// Band for an age in days.
    #[must_use]
    pub fn bucket_for(days: i64) -> AgingBucket {
        match days {
            ..=30 => AgingBucket::Current,
            31..=60 => AgingBucket::Days31To60,
            61..=90 => AgingBucket::Days61To90,
            _ => AgingBucket::Days90Plus,
        }
    }

    /// Outstanding on a sales invoice: total less received payments and
    /// applied credit, floored at zero.
    #[must_use]
    pub fn receivable_outstanding(total: Decimal, received: Decimal, credited: Decimal) -> Decimal {
        non_negative(total - received - credited)
    }

    /// Group documents into one row per party.
    ///
    /// Documents with nothing outstanding are ignored. Rows are ordered by
    /// total descending, then by party name.
    #[must_use]
    pub fn build(documents: &[OutstandingDocument], as_of: NaiveDate) -> Vec<AgingRow> {
        let mut rows: Vec<AgingRow> = Vec::new();

        for doc in documents.iter().filter(|d| d.outstanding > Decimal::ZERO) {
            let bucket = Self::bucket_for(Self::age_in_days(as_of, doc.date));
            let idx = match rows.iter().position(|r| r.party_id == doc.party_id) {
                Some(idx) => idx,
                None => {
                    rows.push(AgingRow::new(doc.party_id, doc.party_name.clone()));
                    rows.len() - 1
                }
            };
            rows[idx].add(bucket, doc.outstanding);
        }

        rows.sort_by(|a, b| {
            b.total
                .cmp(&a.total)
                .then_with(|| a.party_name.cmp(&b.party_name))
                .then(a.party_id.cmp(&b.party_id))
        });
        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Days;
    use rstest::rstest;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 17).unwrap()
    }

    fn doc(party: u128, name: &str, days_ago: u64, outstanding: Decimal) -> OutstandingDocument {
        OutstandingDocument {
            party_id: Uuid::from_u128(party),
            party_name: name.to_string(),
            date: today() - Days::new(days_ago),
            outstanding,
        }
    }

    #[rstest]
    #[case(0, AgingBucket::Current)]
    #[case(30, AgingBucket::Current)]
    #[case(31, AgingBucket::Days31To60)]
    #[case(60, AgingBucket::Days31To60)]
    #[case(61, AgingBucket::Days61To90)]
    #[case(90, AgingBucket::Days61To90)]
    #[case(91, AgingBucket::Days90Plus)]
    #[case(400, AgingBucket::Days90Plus)]
    fn test_bucket_boundaries(#[case] days: i64, #[case] expected: AgingBucket) {
        assert_eq!(AgingService::bucket_for(days), expected);
    }

    #[test]
    fn test_future_dated_document_is_current() {
        let tomorrow = today() + Days::new(1);
        assert_eq!(AgingService::age_in_days(today(), tomorrow), 0);
    }

    #[test]
    fn test_ninety_five_days_lands_in_oldest_band() {
        let rows = AgingService::build(&[doc(1, "Axle Division", 95, dec!(1000))], today());
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].days_90_plus, dec!(1000));
        assert_eq!(rows[0].current, Decimal::ZERO);
        assert_eq!(rows[0].total, dec!(1000));
    }

    #[test]
    fn test_rows_grouped_and_sorted() {
        let rows = AgingService::build(
            &[
                doc(1, "Axle Division", 10, dec!(500)),
                doc(2, "Body Division", 45, dec!(2000)),
                doc(1, "Axle Division", 75, dec!(700)),
                doc(3, "Cab Division", 5, Decimal::ZERO),
            ],
            today(),
        );

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].party_name, "Body Division");
        assert_eq!(rows[0].days_31_60, dec!(2000));
        assert_eq!(rows[1].party_name, "Axle Division");
        assert_eq!(rows[1].current, dec!(500));
        assert_eq!(rows[1].days_61_90, dec!(700));
        assert_eq!(rows[1].total, dec!(1200));
    }

    #[test]
    fn test_receivable_outstanding_floors_at_zero() {
        assert_eq!(
            AgingService::receivable_outstanding(dec!(8000), dec!(1000), dec!(5000)),
            dec!(2000)
        );
        assert_eq!(
            AgingService::receivable_outstanding(dec!(8000), dec!(8000), dec!(5000)),
            Decimal::ZERO
        );
    }
}
