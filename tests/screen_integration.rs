//! Integration tests covering config, the screen store, the grid engine and
//! the app working together.

use std::fs;

use gmscreen_config::store::{export_screen, import_screen};
use gmscreen_config::{Config, ConfigError, ScreenStore};
use gmscreen_grid::GridController;
use gmscreen_protocol::{Direction, Message, WidgetKind};
use gmscreen_tui::App;
use serde_json::json;
use tempfile::TempDir;

fn config_with_data_dir(dir: &TempDir) -> Config {
    let config_path = dir.path().join("gmscreen.json5");
    let data_dir = dir.path().join("data");
    fs::write(
        &config_path,
        format!(
            r#"
            {{
                // Three rows of four cells
                grid: {{ rows: 3, columns: 4 }},
                overlay: {{ enabled: false }},
                hide_titles: true,
                data_dir: "{}",
            }}
            "#,
            data_dir.display()
        ),
    )
    .unwrap();
    Config::load_from(&config_path).unwrap()
}

#[tokio::test]
async fn configured_screen_saves_and_reloads() {
    let dir = TempDir::new().unwrap();
    let config = config_with_data_dir(&dir);
    let store = ScreenStore::open(config.resolve_data_dir().unwrap()).unwrap();

    let mut grid = GridController::new(config.grid.rows, config.grid.columns).unwrap();
    let tracker = grid.place(0, WidgetKind::InitiativeTracker).unwrap();
    grid.expand(0, Direction::Down, 2).unwrap();
    let notes = grid.place(5, WidgetKind::Notes).unwrap();
    grid.expand(5, Direction::Right, 2).unwrap();

    let document = grid.capture_document("Goblin Ambush", config.screen_settings(), |instance| {
        (instance.id == notes.id).then(|| json!({ "content": "Ambush at the bridge" }))
    });
    assert!(document.settings.hide_titles);
    assert!(!document.settings.dice_overlay);

    store.save_screen("screen_1", &document).unwrap();
    let listed = store.list_screens().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].name, "Goblin Ambush");

    let loaded = store.load_screen("screen_1").unwrap();
    let (restored, widgets) = GridController::from_document(&loaded).unwrap();

    assert_eq!(restored.state().covered_cells(0), vec![0, 4, 8]);
    assert_eq!(restored.state().covered_cells(5), vec![5, 6, 7]);
    assert_eq!(widgets.len(), 2);
    assert!(widgets.iter().all(|(instance, _)| instance.id != tracker.id));

    for (instance, state) in &widgets {
        store.save_instance_state(instance.id, state).unwrap();
    }
    let restored_notes = restored.state().instance_at(5).unwrap();
    assert_eq!(
        store.load_instance_state(restored_notes.id).unwrap(),
        Some(json!({ "content": "Ambush at the bridge" }))
    );
}

#[tokio::test]
async fn duplicate_screen_names_are_rejected() {
    let dir = TempDir::new().unwrap();
    let config = config_with_data_dir(&dir);
    let store = ScreenStore::open(config.resolve_data_dir().unwrap()).unwrap();

    let grid = GridController::new(2, 2).unwrap();
    let document = grid.capture_document("Crypt", config.screen_settings(), |_| None);
    store.save_screen("screen_a", &document).unwrap();

    let shouted = grid.capture_document("CRYPT", config.screen_settings(), |_| None);
    let err = store.save_screen("screen_b", &shouted).unwrap_err();
    assert!(matches!(err, ConfigError::DuplicateScreenName { .. }));

    // Saving again under the same id is an update
    store.save_screen("screen_a", &shouted).unwrap();
    assert_eq!(store.list_screens().unwrap().len(), 1);
}

#[tokio::test]
async fn app_round_trips_through_export_file() {
    let dir = TempDir::new().unwrap();
    let config = config_with_data_dir(&dir);
    let store = ScreenStore::open(config.resolve_data_dir().unwrap()).unwrap();

    let mut app = App::new(config.screen_settings())
        .unwrap()
        .with_store(store.clone(), "screen_app");
    app.set_screen_name("Sunken Temple");
    app.update(Message::Select);
    app.update(Message::SelectorConfirm);
    app.update(Message::Expand {
        direction: Direction::Right,
    });
    app.update(Message::Save);

    let saved = store.load_screen("screen_app").unwrap();
    assert_eq!(saved.components.len(), 1);
    assert_eq!(saved.components[0].col_span, 2);

    let export_path = dir.path().join("sunken_temple.json");
    export_screen(&saved, &export_path).unwrap();
    let imported = import_screen(&export_path).unwrap();

    let reopened = App::from_document(&imported)
        .unwrap()
        .with_store(store.clone(), "screen_copy");
    let grid = reopened.grid().state();
    assert_eq!(grid.covered_cells(0), vec![0, 1]);
    assert_eq!(
        grid.instance_at(0).map(|instance| instance.title()),
        Some("Initiative 1")
    );

    // Opening with a store seeds the instance store with the saved state
    let id = grid.instance_at(0).unwrap().id;
    assert!(store.load_instance_state(id).unwrap().is_some());
}
