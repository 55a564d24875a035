use feature_column::{
    BucketColumn, CategoryColumnKind, DataFormat, DataType, EmbeddingColumn, FeatureColumn,
    FeatureColumnKind, FieldDesc, NumericColumn,
};
use feature_derivation::{
    derive_feature_columns, infer_field_descs, DerivationConfig, DerivationError, SampleTable,
};

fn census() -> SampleTable {
    SampleTable::from_json(include_str!("fixtures/census_sample.json")).expect("decode sample")
}

#[test]
fn infer_census_fields() {
    let descs = infer_field_descs(&census(), &DerivationConfig::default()).expect("infer");
    let names: Vec<&str> = descs.iter().map(|d| d.name()).collect();
    assert_eq!(
        names,
        vec!["age", "hours_per_week", "workclass", "occupation_ids", "interests", "income"]
    );

    let age = &descs[0];
    assert_eq!(age.dtype(), DataType::Int64);
    assert_eq!(age.shape(), &[1]);
    assert_eq!(age.max_id(), 53);

    assert_eq!(descs[1].dtype(), DataType::Float32);
    assert!(!descs[1].is_sparse());

    let workclass = &descs[2];
    assert_eq!(workclass.dtype(), DataType::String);
    let vocabulary: Vec<&str> = workclass.vocabulary().iter().map(String::as_str).collect();
    assert_eq!(vocabulary, vec!["Private", "Self-emp-not-inc", "State-gov"]);

    let occupation = &descs[3];
    assert_eq!(occupation.format(), DataFormat::Csv);
    assert!(occupation.is_sparse());
    assert_eq!(occupation.shape(), &[18]);

    let interests = &descs[4];
    assert_eq!(interests.format(), DataFormat::Kv);
    assert_eq!(interests.dtype(), DataType::Float32);
    assert_eq!(interests.shape(), &[12]);

    // The inferred descriptors survive their JSON record.
    for desc in &descs {
        let restored = FieldDesc::from_json(&desc.to_json().unwrap()).unwrap();
        assert_eq!(&restored, desc);
    }
}

#[test]
fn derive_census_columns() {
    let config = DerivationConfig::default();
    let descs = infer_field_descs(&census(), &config).expect("infer");

    let declared: Vec<FeatureColumnKind> = vec![
        BucketColumn::new(NumericColumn::new(FieldDesc::named("age")), vec![30.0, 40.0, 50.0])
            .unwrap()
            .into(),
        EmbeddingColumn::new(None, "workclass")
            .with_dimension(4)
            .unwrap()
            .into(),
    ];
    let derived = derive_feature_columns(&declared, &descs, Some("income"), &config)
        .expect("derive");

    let kinds: Vec<&str> = derived.features.iter().map(|c| c.kind_name()).collect();
    assert_eq!(
        kinds,
        vec!["bucket", "embedding", "numeric", "category_id", "category_id"]
    );

    // Declared columns now carry the inferred descriptors.
    assert_eq!(derived.features[0].get_field_desc()[0], descs[0]);
    assert_eq!(derived.features[0].num_class(), Some(4));
    match &derived.features[1] {
        FeatureColumnKind::Embedding(e) => {
            assert!(matches!(
                e.category_column(),
                Some(CategoryColumnKind::CategoryId(_))
            ));
            assert_eq!(e.num_class(), Some(3));
            assert_eq!(e.dimension(), Some(4));
        }
        other => panic!("unexpected column: {:?}", other),
    }
    assert_eq!(derived.features[3].num_class(), Some(18));
    assert_eq!(derived.features[4].num_class(), Some(12));

    let label = derived.label.expect("label");
    assert_eq!(label.name(), "income");
    assert!(derived
        .features
        .iter()
        .all(|c| c.get_field_desc().iter().all(|d| d.name() != "income")));

    // Derived columns serialize and restore unchanged.
    for column in &derived.features {
        let restored = FeatureColumnKind::from_json(&column.to_json().unwrap()).unwrap();
        assert_eq!(&restored, column);
    }
}

#[test]
fn vocabulary_limit_switches_to_hashing() {
    let config = DerivationConfig::new().with_max_vocabulary_size(2);
    let descs = infer_field_descs(&census(), &config).expect("infer");
    assert!(descs[2].vocabulary().is_empty());

    let derived = derive_feature_columns(&[], &descs, Some("income"), &config).expect("derive");
    match &derived.features[2] {
        FeatureColumnKind::Indicator(i) => {
            assert!(matches!(
                i.category_column(),
                Some(CategoryColumnKind::CategoryHash(_))
            ));
            assert_eq!(i.num_class(), Some(2));
        }
        other => panic!("unexpected column: {:?}", other),
    }
}

#[test]
fn config_from_json_drives_sampling() {
    let config = DerivationConfig::from_json_str(r#"{"max_sample_rows": 1}"#).unwrap();
    let descs = infer_field_descs(&census(), &config).expect("infer");
    // Only the first row is inspected.
    assert_eq!(descs[0].max_id(), 39);
    assert_eq!(descs[3].shape(), &[2]);
    assert!(!descs[3].is_sparse());
}

#[test]
fn mixed_column_fails() {
    let table = SampleTable::from_json(r#"{"columns": ["x"], "rows": [[1], ["a"]]}"#).unwrap();
    let err = infer_field_descs(&table, &DerivationConfig::default()).unwrap_err();
    assert!(matches!(err, DerivationError::ConflictingFormat { .. }));
    assert!(err.to_string().contains("\"x\""));
}
