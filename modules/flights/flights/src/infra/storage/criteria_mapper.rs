//! Maps domain predicates onto `SeaORM` conditions.

use sea_orm::sea_query::{Expr, LikeExpr, SimpleExpr};
use sea_orm::{ColumnTrait, Condition};

use crate::domain::criteria::{FlightPredicate, fold_case};
use crate::infra::storage::entity::Column;

const LIKE_ESCAPE: char = '\\';

/// Conjunction of all predicates. An empty slice yields a condition that
/// matches every row.
#[must_use]
pub fn to_condition(predicates: &[FlightPredicate]) -> Condition {
    predicates
        .iter()
        .fold(Condition::all(), |cond, p| cond.add(predicate_expr(p)))
}

fn predicate_expr(predicate: &FlightPredicate) -> SimpleExpr {
    match predicate {
        FlightPredicate::FlightNumber(v) => contains_folded(Column::FlightNumberLc, v),
        FlightPredicate::DepartureIata(v) => contains_folded(Column::DepartureIataLc, v),
        FlightPredicate::ArrivalIata(v) => contains_folded(Column::ArrivalIataLc, v),
        FlightPredicate::Airline(v) => contains_folded(Column::AirlineLc, v),
        FlightPredicate::Gate(gate) => Column::Gate.eq(*gate),
    }
}

/// `folded_col LIKE '%needle%'` with the folded needle matched literally.
fn contains_folded(column: Column, needle: &str) -> SimpleExpr {
    let pattern = format!("%{}%", escape_like(&fold_case(needle)));
    Expr::col(column).like(LikeExpr::new(pattern).escape(LIKE_ESCAPE))
}

fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '%' | '_' | LIKE_ESCAPE) {
            escaped.push(LIKE_ESCAPE);
        }
        escaped.push(c);
    }
    escaped
}
