use crate::domain::money::{Money, format_amount};
use crate::domain::nvp::{NvpRequest, NvpValue, line_item_index};
use rust_decimal::Decimal;

/// Item and order totals as written back into the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Totals {
    pub item_amount: Money,
    pub order_amount: Money,
}

/// Rebuilds `ITEMAMT`/`AMT` from the line items so they agree to the cent.
///
/// Each amount was converted and rounded on its own, so the converted line
/// items no longer have to add up to the converted `ITEMAMT`, and PayPal
/// rejects a request where they don't. This sums `L_AMT{n} * L_QTY{n}`
/// (quantity defaults to 1), adds the charges, and overwrites both the
/// top-level and `PAYMENTREQUEST_0_` totals. Missing `L_NAME{n}` and
/// `L_NUMBER{n}` get placeholder values along the way.
///
/// A request without line items ends up with `ITEMAMT` at `0.00` and `AMT`
/// equal to its charges.
pub fn reconcile_totals(request: &mut NvpRequest) -> Totals {
    let mut indices: Vec<u32> = request
        .iter()
        .filter(|(_, value)| value.is_scalar())
        .filter_map(|(key, _)| line_item_index(key))
        .collect();
    indices.sort_unstable();
    indices.dedup();

    let mut line_total = Decimal::ZERO;
    for idx in indices {
        let ordinal = u64::from(idx) + 1;
        fill_if_blank(request, format!("L_NAME{idx}"), format!("Product {ordinal}"));
        fill_if_blank(request, format!("L_NUMBER{idx}"), format!("SKU-{ordinal}"));

        let unit = request.decimal(&format!("L_AMT{idx}")).unwrap_or(Decimal::ZERO);
        let qty = request.decimal(&format!("L_QTY{idx}")).unwrap_or(Decimal::ONE);
        line_total = line_total.saturating_add(unit.saturating_mul(qty));
    }

    let item_amount = Money::new(line_total);
    let shipping = charge(request, "SHIPPINGAMT");
    let tax = charge(request, "TAXAMT");
    let handling = charge(request, "HANDLINGAMT");
    let insurance = charge(request, "INSURANCEAMT");
    let ship_discount = charge(request, "SHIPDISCAMT");

    let order_amount = Money::new(
        item_amount
            .value()
            .saturating_add(shipping)
            .saturating_add(tax)
            .saturating_add(handling)
            .saturating_add(insurance)
            .saturating_sub(ship_discount),
    );

    request.set("ITEMAMT", item_amount.to_string());
    request.set("PAYMENTREQUEST_0_ITEMAMT", item_amount.to_string());
    request.set("AMT", order_amount.to_string());
    request.set("PAYMENTREQUEST_0_AMT", order_amount.to_string());

    request.set("PAYMENTREQUEST_0_TAXAMT", format_amount(tax));
    request.set("PAYMENTREQUEST_0_SHIPPINGAMT", format_amount(shipping));
    // zero optional charges are left out, PayPal flags them
    for (field, amount) in [
        ("PAYMENTREQUEST_0_HANDLINGAMT", handling),
        ("PAYMENTREQUEST_0_INSURANCEAMT", insurance),
        ("PAYMENTREQUEST_0_SHIPDISCAMT", ship_discount),
    ] {
        if !amount.is_zero() {
            request.set(field, format_amount(amount));
        }
    }

    Totals {
        item_amount,
        order_amount,
    }
}

fn fill_if_blank(request: &mut NvpRequest, key: String, placeholder: String) {
    if request.get(&key).is_none_or(NvpValue::is_blank) {
        request.set(key, placeholder);
    }
}

/// Top-level charge, else its `PAYMENTREQUEST_0_` twin, else zero.
fn charge(request: &NvpRequest, field: &str) -> Decimal {
    request
        .get(field)
        .or_else(|| request.get(&format!("PAYMENTREQUEST_0_{field}")))
        .filter(|value| value.is_scalar())
        .map(NvpValue::as_decimal)
        .unwrap_or(Decimal::ZERO)
}
