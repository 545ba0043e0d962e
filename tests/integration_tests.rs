use anyhow::Result;
use insurance_premium::adapters::CsvFileDataset;
use insurance_premium::core::advisory::TipKind;
use insurance_premium::core::ChargeModel;
use insurance_premium::domain::model::{RawClientInput, Region, Sex, Smoker};
use insurance_premium::ml::SetupOptions;
use insurance_premium::{
    AppConfig, BmiPolicy, FeatureDeriver, LocalStorage, ModelStore, PremiumError, QuoteEngine,
};
use std::fmt::Write as _;
use tempfile::TempDir;

const REGIONS: [&str; 4] = ["southwest", "southeast", "northwest", "northeast"];

/// 依已知公式產生訓練資料
fn write_dataset(dir: &TempDir, rows: u32) -> Result<String> {
    let mut csv = String::from("age,sex,bmi,children,smoker,region,charges\n");
    for i in 0..rows {
        let age = 18 + (i * 11) % 47;
        let sex = if i % 7 < 3 { "male" } else { "female" };
        let bmi = 18.0 + f64::from((i * 13) % 25) * 0.9;
        let children = i % 5;
        let smoker = matches!(i % 9, 0 | 4);
        let region = REGIONS[(i % 4) as usize];
        let charges = 1_500.0
            + 255.0 * f64::from(age)
            + 410.0 * f64::from(children)
            + 35.0 * bmi
            + if smoker { 12_000.0 + 1_450.0 * (bmi - 18.0) } else { 0.0 };
        writeln!(
            csv,
            "{},{},{:.1},{},{},{},{:.3}",
            age,
            sex,
            bmi,
            children,
            if smoker { "yes" } else { "no" },
            region,
            charges
        )?;
    }

    let path = dir.path().join("insurance.csv");
    std::fs::write(&path, csv)?;
    Ok(path.to_string_lossy().to_string())
}

fn input(smoker: Smoker, bmi: f64, age: u32, children: u32) -> RawClientInput {
    RawClientInput {
        age,
        sex: Sex::Female,
        bmi: Some(bmi),
        children,
        smoker,
        region: Region::Northeast,
        height_cm: None,
        weight_kg: None,
    }
}

#[tokio::test]
async fn test_end_to_end_train_then_reload() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let dataset_path = write_dataset(&temp_dir, 150)?;
    let storage = LocalStorage::new(temp_dir.path().to_string_lossy().to_string());
    let store = ModelStore::new(storage, "insurance_model", SetupOptions::default());

    let trained = store.load_or_train(&CsvFileDataset::new(&dataset_path)).await?;
    assert!(temp_dir.path().join("insurance_model.apr").exists());
    assert!(temp_dir.path().join("insurance_model.json").exists());
    assert_eq!(trained.algorithm(), "lr_interact");
    assert_eq!(trained.metadata().training_rows, 150);

    // 刪除資料集後仍可載入既有模型
    std::fs::remove_file(&dataset_path)?;
    let reloaded = store.load_or_train(&CsvFileDataset::new(&dataset_path)).await?;
    assert_eq!(reloaded.algorithm(), "lr_interact");

    let engine = QuoteEngine::new(reloaded, FeatureDeriver::default());
    let quote = engine.quote(&RawClientInput {
        age: 40,
        sex: Sex::Male,
        bmi: None,
        children: 2,
        smoker: Smoker::Yes,
        region: Region::Southeast,
        height_cm: Some(175.0),
        weight_kg: Some(70.0),
    })?;

    let expected = 1_500.0 + 255.0 * 40.0 + 410.0 * 2.0 + 35.0 * 22.9 + 12_000.0 + 1_450.0 * 4.9;
    assert_eq!(quote.record.bmi, 22.9);
    assert!((quote.prediction.monthly_charge - expected).abs() / expected < 0.005);
    assert_eq!(quote.tips, vec![TipKind::QuitSmoking.message().to_string()]);
    Ok(())
}

#[tokio::test]
async fn test_missing_dataset_is_model_unavailable() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let storage = LocalStorage::new(temp_dir.path().to_string_lossy().to_string());
    let store = ModelStore::new(storage, "insurance_model", SetupOptions::default());

    let missing = temp_dir.path().join("nope.csv");
    let err = store
        .load_or_train(&CsvFileDataset::new(missing))
        .await
        .unwrap_err();

    assert!(matches!(err, PremiumError::ModelUnavailable { .. }));
    assert!(!temp_dir.path().join("insurance_model.apr").exists());
    assert!(!temp_dir.path().join("insurance_model.json").exists());
    Ok(())
}

#[tokio::test]
async fn test_store_from_toml_config() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let dataset_path = write_dataset(&temp_dir, 60)?;
    let config = AppConfig::from_toml_str(&format!(
        r#"
[model]
path = "models/premium"
session_id = 42

[dataset]
path = "{}"
"#,
        dataset_path.replace('\\', "/")
    ))?;

    let storage = LocalStorage::new(temp_dir.path().to_string_lossy().to_string());
    let store = ModelStore::from_config(storage, &config);
    let handle = store.load_or_train(config.dataset_source()?.as_ref()).await?;

    assert_eq!(store.artifact_path(), "models/premium.apr");
    assert!(temp_dir.path().join("models/premium.apr").exists());
    assert!(temp_dir.path().join("models/premium.json").exists());
    assert!(!handle.metadata().leaderboard.is_empty());
    Ok(())
}

#[test]
fn test_advice_scenarios() -> Result<()> {
    let deriver = FeatureDeriver::default();
    let advisor = insurance_premium::AdvisoryEngine::new();

    // A: smoker only
    let a = deriver.canonicalize(&input(Smoker::Yes, 22.0, 40, 1))?;
    assert_eq!(advisor.advise(&a), vec![TipKind::QuitSmoking.message().to_string()]);

    // B: bmi, age, children in table order
    let b = deriver.canonicalize(&input(Smoker::No, 32.0, 22, 5))?;
    assert_eq!(
        advisor.advise(&b),
        vec![
            TipKind::ReduceBmi.message().to_string(),
            TipKind::YouthPlan.message().to_string(),
            TipKind::FamilyPolicy.message().to_string(),
        ]
    );

    // C: nothing to improve
    let c = deriver.canonicalize(&input(Smoker::No, 22.0, 40, 1))?;
    assert_eq!(
        advisor.advise(&c),
        vec![TipKind::AlreadyOptimal.message().to_string()]
    );
    Ok(())
}

#[test]
fn test_bmi_scenario_and_policies() -> Result<()> {
    // D
    assert_eq!(FeatureDeriver::default().derive(175.0, 70.0, None)?, 22.9);
    // 22.25 與 22.75 剛好落在中間，取偶數
    assert_eq!(FeatureDeriver::default().derive(200.0, 89.0, None)?, 22.2);
    assert_eq!(FeatureDeriver::default().derive(200.0, 91.0, None)?, 22.8);

    let manual = FeatureDeriver::new(BmiPolicy::ManualUnlessSentinel { sentinel: 25.0 });
    assert_eq!(manual.derive(175.0, 70.0, Some(28.3))?, 28.3);
    assert_eq!(manual.derive(175.0, 70.0, Some(25.0))?, 22.9);

    assert!(matches!(
        FeatureDeriver::default().derive(0.0, 70.0, None),
        Err(PremiumError::InvalidInput { .. })
    ));
    assert!(matches!(
        FeatureDeriver::default().derive(175.0, 0.0, None),
        Err(PremiumError::InvalidInput { .. })
    ));
    Ok(())
}
