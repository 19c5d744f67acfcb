use super::totals::reconcile_totals;
use crate::config::Settings;
use crate::domain::conversion::{ConversionLog, ConversionRecord};
use crate::domain::method::NvpMethod;
use crate::domain::money::format_amount;
use crate::domain::nvp::{FieldKind, MAJOR_AMOUNTS, NvpRequest, NvpValue};
use crate::domain::ports::{ConversionRegistryRef, CurrencyConverterBox, StoreContextBox};
use crate::error::Result;
use chrono::Utc;
use tracing::{debug, info};

/// Rewrites outbound NVP calls of a store whose base currency PayPal does not
/// accept.
///
/// Every relevant call leaves with its currency forced to the target
/// currency; calls that carry money also get every amount converted, their
/// totals rebuilt from the line items, a conversion note in `NOTETEXT`, and a
/// [`ConversionRecord`] published to the registry for the audit path.
pub struct RequestRewriter {
    settings: Settings,
    converter: CurrencyConverterBox,
    store: StoreContextBox,
    registry: ConversionRegistryRef,
}

impl RequestRewriter {
    /// Creates a new `RequestRewriter`.
    ///
    /// # Arguments
    ///
    /// * `settings` - Currency pair and registry slot.
    /// * `converter` - Host exchange-rate conversion.
    /// * `store` - Source of the store's base currency.
    /// * `registry` - Mailbox shared with the audit attacher.
    pub fn new(
        settings: Settings,
        converter: CurrencyConverterBox,
        store: StoreContextBox,
        registry: ConversionRegistryRef,
    ) -> Self {
        Self {
            settings,
            converter,
            store,
            registry,
        }
    }

    /// Intercepts a call before it reaches the transport.
    ///
    /// Calls that don't apply come back untouched. Malformed or missing fields
    /// never fail the call; only the host ports (store lookup, rate
    /// conversion, registry) can return an error.
    pub fn before_call(
        &self,
        method: String,
        mut request: NvpRequest,
    ) -> Result<(String, NvpRequest)> {
        let base_currency = self.store.base_currency_code()?;
        if base_currency != self.settings.source_currency {
            debug!(%method, %base_currency, "base currency not rewritten, passing through");
            return Ok((method, request));
        }

        let Ok(nvp_method) = method.parse::<NvpMethod>() else {
            debug!(%method, "not a payment call, passing through");
            return Ok((method, request));
        };

        let target = self.settings.target_currency.as_str();

        if nvp_method.is_read_only() {
            force_currency(&mut request, target);
            return Ok((method, request));
        }

        let source_currency = request
            .get("PAYMENTREQUEST_0_CURRENCYCODE")
            .or_else(|| request.get("CURRENCYCODE"))
            .map(ToString::to_string);

        force_currency(&mut request, target);

        if let Some(action) = request.get("PAYMENTACTION").filter(|v| v.is_scalar()) {
            let action = action.to_string();
            request.set("PAYMENTREQUEST_0_PAYMENTACTION", action);
        }

        if source_currency.is_some_and(|code| code.to_uppercase() == target) {
            debug!(%method, "request already in target currency, skipping conversion");
            return Ok((method, request));
        }

        let mut log = ConversionLog::new(
            &self.settings.conversion_marker(),
            &self.settings.source_currency,
            target,
        );
        self.convert_amounts(&mut request, &mut log)?;
        let totals = reconcile_totals(&mut request);
        debug!(
            item_amount = %totals.item_amount,
            order_amount = %totals.order_amount,
            "totals rebuilt from line items"
        );

        let comment = log.into_comment();
        let note = match request.text("NOTETEXT").filter(|note| !note.is_empty()) {
            Some(existing) => format!("{existing} {comment}"),
            None => comment.clone(),
        };
        request.set("NOTETEXT", note);

        let record = ConversionRecord {
            comment,
            original_currency: self.settings.source_currency.clone(),
            target_currency: target.to_string(),
            timestamp: Utc::now(),
            token: request.text("TOKEN").unwrap_or_default(),
            method: method.clone(),
            request_snapshot: request.clone(),
        };
        self.registry.set(&self.settings.registry_key, record, true)?;
        info!(%method, registry_key = %self.settings.registry_key, "conversion record published");

        Ok((method, request))
    }

    /// Converts every scalar amount field in place.
    fn convert_amounts(&self, request: &mut NvpRequest, log: &mut ConversionLog) -> Result<()> {
        let amounts: Vec<(String, NvpValue)> = request
            .iter()
            .filter(|(key, value)| value.is_scalar() && FieldKind::classify(key).is_amount())
            .map(|(key, value)| (key.to_string(), value.clone()))
            .collect();

        for (key, original) in amounts {
            let converted = self
                .converter
                .convert(original.as_decimal(), None, &self.settings.target_currency)?;
            let formatted = format_amount(converted);
            if MAJOR_AMOUNTS.contains(&key.as_str()) {
                log.record(&key, &original.to_string(), &formatted);
            }
            request.set(key, formatted);
        }
        Ok(())
    }
}

/// Forces `CURRENCYCODE` and every `PAYMENTREQUEST_{n}_CURRENCYCODE` to `target`.
fn force_currency(request: &mut NvpRequest, target: &str) {
    request.set("CURRENCYCODE", target);
    request.set("PAYMENTREQUEST_0_CURRENCYCODE", target);

    let scoped: Vec<String> = request
        .keys()
        .filter(|key| FieldKind::classify(key) == FieldKind::CurrencyCode)
        .map(str::to_string)
        .collect();
    for key in scoped {
        request.set(key, target);
    }
}
