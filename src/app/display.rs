use crate::domain::model::Quote;
use crate::ml::artifact::ModelMetadata;
use crate::utils::error::Result;

pub fn render_tips(tips: &[String]) -> String {
    let mut out = String::from("💡 How to lower the premium:\n");
    for tip in tips {
        out.push_str(&format!("- {}\n", tip));
    }
    out
}

pub fn render_quote(quote: &Quote) -> String {
    let record = &quote.record;
    let mut out = format!(
        "📋 Client: age {}, {}, BMI {:.1}, children {}, smoker {}, region {}\n",
        record.age, record.sex, record.bmi, record.children, record.smoker, record.region
    );
    out.push_str(&format!(
        "💵 Predicted monthly charge: {:.2} USD\n",
        quote.prediction.monthly_charge
    ));
    out.push_str(&render_tips(&quote.tips));
    out
}

pub fn render_quote_json(quote: &Quote) -> Result<String> {
    Ok(serde_json::to_string_pretty(quote)?)
}

pub fn render_leaderboard(metadata: &ModelMetadata) -> String {
    let mut out = format!(
        "🏆 Model '{}' trained at {} on {} rows\n",
        metadata.algorithm,
        metadata.trained_at.format("%Y-%m-%d %H:%M:%S UTC"),
        metadata.training_rows
    );
    out.push_str(&format!("{:<12} {:>8} {:>12} {:>12}\n", "Model", "R2", "MAE", "RMSE"));
    for score in &metadata.leaderboard {
        out.push_str(&format!(
            "{:<12} {:>8.4} {:>12.2} {:>12.2}\n",
            score.algorithm, score.r2, score.mae, score.rmse
        ));
    }
    out
}
