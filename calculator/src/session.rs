//! Calculator session: the form state and its refresh cycle.
//!
//! A front end edits [`ConversionInput`] fields through
//! [`CalculatorSession::input_mut`] and calls
//! [`CalculatorSession::recalculate`] after every change. Rate lookups seed the
//! market rates; when they fail the previous values stay in effect and the
//! failure is only logged.

use p2pcalc_common::Currency;
use p2pcalc_fx::{FxResult, MarketRates, RateProvider};
use tracing::{debug, info, warn};

use crate::converter::calculate;
use crate::input::ConversionInput;
use crate::outcome::ConversionOutcome;

/// Form state owned by a front end.
#[derive(Debug, Clone)]
pub struct CalculatorSession {
    input: ConversionInput,
    base_currency: Currency,
    supported_currencies: Vec<Currency>,
    loading: bool,
    last_outcome: Option<ConversionOutcome>,
}

impl Default for CalculatorSession {
    fn default() -> Self {
        Self::new(ConversionInput::default())
    }
}

impl CalculatorSession {
    /// Create a session. It starts loading until the first currency fetch
    /// completes.
    pub fn new(input: ConversionInput) -> Self {
        Self {
            input,
            base_currency: Currency::eur(),
            supported_currencies: Vec::new(),
            loading: true,
            last_outcome: None,
        }
    }

    /// Fetch rates against `base` instead of EUR.
    pub fn with_base_currency(mut self, base: Currency) -> Self {
        self.base_currency = base;
        self
    }

    pub fn base_currency(&self) -> &Currency {
        &self.base_currency
    }

    pub fn input(&self) -> &ConversionInput {
        &self.input
    }

    pub fn input_mut(&mut self) -> &mut ConversionInput {
        &mut self.input
    }

    /// Selectable target currencies, empty until loaded.
    pub fn supported_currencies(&self) -> &[Currency] {
        &self.supported_currencies
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn last_outcome(&self) -> Option<&ConversionOutcome> {
        self.last_outcome.as_ref()
    }

    /// Load the selectable target currencies.
    pub async fn load_currencies(&mut self, provider: &dyn RateProvider) {
        match provider.supported_currencies(&self.base_currency).await {
            Ok(currencies) => {
                info!(
                    provider = provider.name(),
                    base = %self.base_currency,
                    count = currencies.len(),
                    "Loaded supported currencies"
                );
                self.supported_currencies = currencies;
            }
            Err(e) => {
                warn!(
                    provider = provider.name(),
                    error = %e,
                    "Failed to load supported currencies"
                );
            }
        }
        self.loading = false;
    }

    /// Re-seed the market rates for the selected target currency.
    ///
    /// Returns whether new rates were applied. No retry is attempted.
    pub async fn refresh_rates(&mut self, provider: &dyn RateProvider) -> bool {
        let target = self.input.target_currency.clone();
        let applied = match self.fetch_market_rates(provider, &target).await {
            Ok(rates) => {
                info!(
                    provider = provider.name(),
                    target = %target,
                    eur_usd = %rates.eur_usd,
                    eur_target = %rates.eur_target,
                    usd_target = %rates.usd_target,
                    "Applied market rates"
                );
                self.input.apply_market_rates(&rates);
                true
            }
            Err(e) => {
                warn!(
                    provider = provider.name(),
                    target = %target,
                    error = %e,
                    "Failed to refresh exchange rates, keeping previous values"
                );
                false
            }
        };
        self.loading = false;
        applied
    }

    /// Change the target currency and refresh rates for it.
    pub async fn select_target_currency(
        &mut self,
        provider: &dyn RateProvider,
        currency: Currency,
    ) -> bool {
        debug!(from = %self.input.target_currency, to = %currency, "Target currency changed");
        self.input.target_currency = currency;
        self.refresh_rates(provider).await
    }

    /// Recompute the outcome from the current inputs.
    ///
    /// When aligning with the P2P minimum, a finite recommended EUR amount is
    /// written back into the input.
    pub fn recalculate(&mut self) -> &ConversionOutcome {
        let outcome = calculate(&self.input);

        if let Some(recommended) = outcome.recommended_eur_amount {
            match recommended.as_decimal() {
                Some(amount) => self.input.eur_amount = amount,
                None => debug!(
                    recommended = %recommended,
                    "Aligned EUR amount is not finite, keeping input"
                ),
            }
        }

        debug!(
            target_received = %outcome.target_received,
            min_eur_deposit = %outcome.min_eur_deposit,
            total_fees = %outcome.total_fees,
            profit_loss = %outcome.profit_loss,
            "Recalculated"
        );

        self.last_outcome.insert(outcome)
    }

    async fn fetch_market_rates(
        &self,
        provider: &dyn RateProvider,
        target: &Currency,
    ) -> FxResult<MarketRates> {
        let table = provider.fetch_rates(&self.base_currency).await?;
        MarketRates::from_table(&table, target)
    }
}
