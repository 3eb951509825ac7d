//! Banknotes the teller can dispense and accept.
//!
//! Only $20, $50, $100, $200 and $500 notes exist. Every note above $50 is a
//! multiple of 50, so an amount is payable exactly when some number of $50
//! notes leaves a remainder that $20 notes cover. Amounts above
//! [`NOTES_LIMIT`] are refused before any scan.

use core::fmt;

use crate::Money;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Denomination {
    Twenty,
    Fifty,
    OneHundred,
    TwoHundred,
    FiveHundred,
}

impl Denomination {
    /// All notes, largest first.
    pub const ALL: [Denomination; 5] = [
        Denomination::FiveHundred,
        Denomination::TwoHundred,
        Denomination::OneHundred,
        Denomination::Fifty,
        Denomination::Twenty,
    ];

    /// Face value in whole dollars.
    #[must_use]
    pub const fn value(self) -> i64 {
        match self {
            Denomination::Twenty => 20,
            Denomination::Fifty => 50,
            Denomination::OneHundred => 100,
            Denomination::TwoHundred => 200,
            Denomination::FiveHundred => 500,
        }
    }
}

impl fmt::Display for Denomination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}", self.value())
    }
}

/// Largest amount paid or accepted in notes.
pub const NOTES_LIMIT: Money = Money::from_major(i32::MAX as i64);

/// Number of $50 notes in the first combination that pays `units` dollars.
///
/// Linear scan over `0..=units / 50`; amounts at a teller are small.
fn fifties_for(units: i64) -> Option<i64> {
    (0..=units / 50).find(|fifties| (units - fifties * 50) % 20 == 0)
}

/// Largest number of $50 notes that still leaves a remainder payable in $20s.
fn most_fifties_for(units: i64) -> Option<i64> {
    (0..=units / 50)
        .rev()
        .find(|fifties| (units - fifties * 50) % 20 == 0)
}

fn payable_units(amount: Money) -> Option<i64> {
    if amount > NOTES_LIMIT {
        return None;
    }
    amount.whole_units().filter(|units| *units > 0)
}

/// Returns `true` if `amount` can be paid with banknotes only.
///
/// Amounts with cents, non-positive amounts and amounts above
/// [`NOTES_LIMIT`] are never payable.
#[must_use]
pub fn is_payable(amount: Money) -> bool {
    payable_units(amount).and_then(fifties_for).is_some()
}

/// One concrete bundle of notes paying `amount`, largest notes first.
///
/// Uses as many $50-multiples as possible and regroups them into the
/// largest notes, so the bundle stays small.
///
/// Returns `None` exactly when [`is_payable`] is `false`.
#[must_use]
pub fn breakdown(amount: Money) -> Option<Vec<(Denomination, u32)>> {
    let units = payable_units(amount)?;
    let fifties = most_fifties_for(units)?;

    let mut notes = Vec::new();
    let mut rest = fifties * 50;
    for note in Denomination::ALL {
        if note == Denomination::Twenty {
            break;
        }
        let count = rest / note.value();
        if count > 0 {
            notes.push((note, u32::try_from(count).ok()?));
            rest -= count * note.value();
        }
    }

    let twenties = (units - fifties * 50) / 20;
    if twenties > 0 {
        notes.push((Denomination::Twenty, u32::try_from(twenties).ok()?));
    }

    Some(notes)
}
