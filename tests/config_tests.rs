use ledger_forms::config::{self, FormsConfig};
use ledger_forms::forms::{EntityModelForm, FormData, FormSetConfig, ModelForm};
use tempfile::TempDir;

#[test]
fn installed_config_shapes_new_forms() {
    let temp = TempDir::new().expect("create temp dir");
    let path = temp.path().join("config.json");
    let custom = FormsConfig {
        input_class: "form-control".into(),
        transaction_extra_lines: 2,
        ..FormsConfig::default()
    };
    custom.save(&path).expect("save config");

    let loaded = FormsConfig::load(&path).expect("load config");
    assert_eq!(loaded, custom);
    config::install(loaded);

    let form = EntityModelForm::new(FormData::new());
    let attrs = form.fields()[0].widget.attrs().expect("text widget attrs");
    assert_eq!(attrs.class.as_deref(), Some("form-control"));

    let formset_config = FormSetConfig::from_config(&config::active());
    assert_eq!(formset_config.total_lines(), 2);
    assert!(formset_config.allow_delete);
}
