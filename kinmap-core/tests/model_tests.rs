// Tests for the application model and reducer

use kinmap_core::model::{Action, DEFAULT_DATASET, LoadStatus, Model, Page, update};
use kinmap_core::pipeline::{Pipeline, PipelineConfig};
use kinmap_core::record::{RowPolicy, Warning};

fn pipeline() -> Pipeline {
    Pipeline::new(PipelineConfig::default())
}

#[test]
fn test_default_model_is_not_loaded() {
    let model = Model::default();
    assert_eq!(model.page, Page::Map);
    assert_eq!(model.input, DEFAULT_DATASET);
    assert!(model.markers.is_empty());
    assert!(model.edges.is_empty());
    assert_eq!(model.status, LoadStatus::NotLoaded);
    assert!(!model.is_loaded());
}

#[test]
fn test_default_dataset_loads() {
    let model = Model::with_input(DEFAULT_DATASET, &pipeline());
    assert!(model.is_loaded());
    assert_eq!(model.markers.len(), 10);
    assert_eq!(model.edges.len(), 3);
    match model.status {
        LoadStatus::Loaded {
            events,
            ref skipped,
            ref warnings,
        } => {
            assert_eq!(events, 16);
            assert!(skipped.is_empty());
            assert!(warnings.is_empty());
        }
        ref other => panic!("unexpected status {:?}", other),
    }
}

#[test]
fn test_edit_input_only_changes_text() {
    let p = pipeline();
    let model = Model::with_input(DEFAULT_DATASET, &p);
    let markers_before = model.markers.clone();

    let model = update(model, Action::EditInput("new text".to_string()), &p);
    assert_eq!(model.input, "new text");
    assert_eq!(model.markers, markers_before);
    assert!(model.is_loaded());
}

#[test]
fn test_show_page() {
    let p = pipeline();
    let model = update(Model::default(), Action::ShowPage(Page::LoadData), &p);
    assert_eq!(model.page, Page::LoadData);
    assert_eq!(model.status, LoadStatus::NotLoaded);
}

#[test]
fn test_successful_load_switches_to_map() {
    let p = pipeline();
    let model = update(Model::default(), Action::ShowPage(Page::LoadData), &p);
    let model = update(
        model,
        Action::EditInput("A\t1.0\t2.0\t1900\tAlice\nB\t3.0\t4.0\t1900\tAlice".to_string()),
        &p,
    );
    let model = update(model, Action::Load, &p);

    assert_eq!(model.page, Page::Map);
    assert_eq!(model.markers.len(), 2);
    assert_eq!(model.edges.len(), 1);
    match &model.status {
        LoadStatus::Loaded { warnings, .. } => {
            assert_eq!(warnings, &vec![Warning::DegenerateYearRange { year: 1900 }]);
        }
        other => panic!("unexpected status {:?}", other),
    }
}

#[test]
fn test_failed_load_keeps_previous_results() {
    let p = pipeline();
    let model = Model::with_input(DEFAULT_DATASET, &p);
    let markers_before = model.markers.clone();
    let edges_before = model.edges.clone();

    let model = update(model, Action::ShowPage(Page::LoadData), &p);
    let model = update(model, Action::EditInput("broken\trow".to_string()), &p);
    let model = update(model, Action::Load, &p);

    assert_eq!(model.page, Page::LoadData);
    assert_eq!(model.markers, markers_before);
    assert_eq!(model.edges, edges_before);
    match &model.status {
        LoadStatus::Failed { message, rows } => {
            assert!(message.contains("malformed"));
            assert_eq!(rows.len(), 1);
            assert_eq!(rows[0].line, 1);
        }
        other => panic!("unexpected status {:?}", other),
    }
}

#[test]
fn test_empty_load_clears_map() {
    let p = pipeline();
    let model = Model::with_input(DEFAULT_DATASET, &p);
    let model = update(model, Action::EditInput(String::new()), &p);
    let model = update(model, Action::Load, &p);

    assert!(model.markers.is_empty());
    assert!(model.edges.is_empty());
    match &model.status {
        LoadStatus::Loaded {
            events, warnings, ..
        } => {
            assert_eq!(*events, 0);
            assert_eq!(warnings, &vec![Warning::EmptyInput]);
        }
        other => panic!("unexpected status {:?}", other),
    }
}

#[test]
fn test_lenient_pipeline_reports_skipped_rows() {
    let p = Pipeline::new(PipelineConfig {
        policy: RowPolicy::Lenient,
        ..PipelineConfig::default()
    });
    let model = Model::with_input("A\t1.0\t2.0\t1900\tAlice\nbad row", &p);

    assert_eq!(model.markers.len(), 1);
    match &model.status {
        LoadStatus::Loaded { skipped, .. } => {
            assert_eq!(skipped.len(), 1);
            assert_eq!(skipped[0].line, 2);
        }
        other => panic!("unexpected status {:?}", other),
    }
}
