use crate::core::advisory::AdvisoryEngine;
use crate::core::features::FeatureDeriver;
use crate::domain::model::{PredictionResult, Quote, RawClientInput};
use crate::domain::ports::ChargeModel;
use crate::utils::error::Result;

/// One form submission in, one quote out.
pub struct QuoteEngine<M: ChargeModel> {
    model: M,
    deriver: FeatureDeriver,
    advisor: AdvisoryEngine,
}

impl<M: ChargeModel> QuoteEngine<M> {
    pub fn new(model: M, deriver: FeatureDeriver) -> Self {
        Self {
            model,
            deriver,
            advisor: AdvisoryEngine::new(),
        }
    }

    pub fn quote(&self, input: &RawClientInput) -> Result<Quote> {
        let record = self.deriver.canonicalize(input)?;
        tracing::debug!("Client record: {:?}", record);

        let monthly_charge = self.model.predict(&record)?;
        let prediction = PredictionResult { monthly_charge };
        tracing::info!(
            "🔮 Predicted monthly charge {:.2} with model '{}'",
            monthly_charge,
            self.model.algorithm()
        );

        let tips = self.advisor.advise_with_prediction(&record, &prediction);

        Ok(Quote {
            record,
            prediction,
            tips,
        })
    }
}
