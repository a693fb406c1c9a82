//! Pricing a refurbished gear cart end to end through the public API.

use rusty_money::iso;
use testresult::TestResult;

use rigenerato::{
    cart::CartLine,
    discounts::Discount,
    money::format_minor,
    pricing::{Totals, price_cart},
};

fn decks_and_mixer() -> Vec<CartLine> {
    vec![
        // pair of turntables
        CartLine::new(34_900, 2),
        // two-channel mixer
        CartLine::new(49_900, 1),
        // slipmats
        CartLine::new(1_250, 3),
    ]
}

#[test]
fn order_total_is_line_sum_minus_discount() -> TestResult {
    let lines = decks_and_mixer();
    let discount = Discount::percent_off(15)?;

    let totals = price_cart(&lines, Some(&discount))?;

    let line_sum: u64 = lines.iter().map(CartLine::subtotal).sum::<Result<u64, _>>()?;

    assert_eq!(totals.subtotal, line_sum);
    assert_eq!(totals.total, line_sum - totals.discount);

    Ok(())
}

#[test]
fn fifteen_percent_rounds_to_the_nearest_cent() -> TestResult {
    let totals = price_cart(&decks_and_mixer(), Some(&Discount::percent_off(15)?))?;

    assert_eq!(
        totals,
        Totals {
            subtotal: 123_450,
            discount: 18_518,
            total: 104_932,
        }
    );

    Ok(())
}

#[test]
fn fixed_amount_bigger_than_cart_makes_it_free() -> TestResult {
    let totals = price_cart(&[CartLine::new(1_250, 1)], Some(&Discount::amount_off(5_000)))?;

    assert_eq!(totals.total, 0);
    assert_eq!(totals.discount, 1_250);

    Ok(())
}

#[test]
fn totals_render_in_store_currency() -> TestResult {
    let totals = price_cart(&decks_and_mixer(), None)?;

    assert_eq!(format_minor(totals.total, iso::EUR)?, "€1.234,50");

    Ok(())
}
