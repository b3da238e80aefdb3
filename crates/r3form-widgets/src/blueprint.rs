//! Serializable description of a whole form.
//!
//! ```json
//! {
//!   "form": { "camera": "top-left", "gap": 0.5 },
//!   "fields": [
//!     { "kind": "input", "name": "email" },
//!     { "kind": "switch", "name": "newsletter" },
//!     { "kind": "tooltip", "text": "We never share it" },
//!     { "kind": "submit" }
//!   ]
//! }
//! ```

use serde::{Deserialize, Serialize};

use r3form_core::{FormConfig, FormResult};

use crate::buttons::{Button, ButtonAction, ButtonStyle};
use crate::form::FormBuilder;
use crate::input::{Input, InputConfig};
use crate::slider::{Slider, SliderConfig};
use crate::switch::{Switch, SwitchConfig};
use crate::tooltip::{Tooltip, TooltipConfig};
use crate::widget::Widget;

fn default_button_label() -> String {
    "Button".to_string()
}

/// One child of a form blueprint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldBlueprint {
    Input(InputConfig),
    Switch(SwitchConfig),
    Slider(SliderConfig),
    /// A button without an action.
    Button {
        #[serde(default = "default_button_label")]
        label: String,
        #[serde(default)]
        style: ButtonStyle,
    },
    /// The submit button.
    Submit {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        label: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        style: Option<ButtonStyle>,
    },
    Tooltip(TooltipConfig),
}

impl FieldBlueprint {
    /// Create the widget.
    pub fn into_widget(self) -> Box<dyn Widget> {
        match self {
            Self::Input(config) => Box::new(Input::new(config)),
            Self::Switch(config) => Box::new(Switch::new(config)),
            Self::Slider(config) => Box::new(Slider::new(config)),
            Self::Button { label, style } => Box::new(Button::styled(label, style)),
            Self::Submit { label, style } => Box::new(
                Button::styled(
                    label.unwrap_or_else(|| "Submit".to_string()),
                    style.unwrap_or_else(ButtonStyle::submit),
                )
                .with_action(ButtonAction::Submit),
            ),
            Self::Tooltip(config) => Box::new(Tooltip::new(config)),
        }
    }
}

/// A form configuration plus its children.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FormBlueprint {
    #[serde(default)]
    pub form: FormConfig,
    #[serde(default)]
    pub fields: Vec<FieldBlueprint>,
}

impl FormBlueprint {
    /// Parse a blueprint from JSON and validate its form configuration.
    pub fn from_json(json: &str) -> FormResult<Self> {
        let blueprint: Self = serde_json::from_str(json)?;
        blueprint.form.validate()?;
        Ok(blueprint)
    }

    pub fn to_json(&self) -> FormResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// A builder with every child of the blueprint added.
    pub fn into_builder(self) -> FormBuilder {
        self.fields
            .into_iter()
            .fold(FormBuilder::new(self.form), |builder, field| {
                builder.boxed_child(field.into_widget())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widget::WidgetKind;
    use r3form_core::{FormError, Viewpoint};

    const SIGNUP: &str = r##"{
        "form": { "camera": "top-left", "form_color": "#ffffff" },
        "fields": [
            { "kind": "input", "name": "email", "show_field_background": true },
            { "kind": "switch", "name": "newsletter" },
            { "kind": "slider", "name": "volume" },
            { "kind": "tooltip", "text": "We never share it" },
            { "kind": "button", "label": "Reset", "style": { "color": "#ff0000" } },
            { "kind": "submit" }
        ]
    }"##;

    #[test]
    fn test_parse_blueprint() {
        let blueprint = FormBlueprint::from_json(SIGNUP).unwrap();
        assert_eq!(blueprint.form.viewpoint(), Viewpoint::TopLeft);
        assert_eq!(blueprint.fields.len(), 6);
        match &blueprint.fields[0] {
            FieldBlueprint::Input(config) => {
                assert_eq!(config.name, "email");
                assert!(config.show_field_background);
                assert!((config.width - 6.0).abs() < f64::EPSILON);
            }
            other => panic!("expected input, got {other:?}"),
        }
        assert_eq!(
            blueprint.fields[5],
            FieldBlueprint::Submit {
                label: None,
                style: None
            }
        );
    }

    #[test]
    fn test_build_form_from_blueprint() {
        let form = FormBlueprint::from_json(SIGNUP).unwrap().into_builder().build().unwrap();
        assert_eq!(
            form.child_kinds(),
            vec![
                WidgetKind::Input,
                WidgetKind::Switch,
                WidgetKind::Slider,
                WidgetKind::Tooltip,
                WidgetKind::Button,
                WidgetKind::Button,
            ]
        );
    }

    #[test]
    fn test_unknown_kind_rejected() {
        let result = FormBlueprint::from_json(r#"{"fields": [{"kind": "dropdown"}]}"#);
        assert!(matches!(result, Err(FormError::Json(_))));
    }

    #[test]
    fn test_invalid_form_config_rejected() {
        let result = FormBlueprint::from_json(r#"{"form": {"width": 0}}"#);
        assert!(matches!(result, Err(FormError::InvalidConfig(_))));
    }

    #[test]
    fn test_to_json_tags_fields_by_kind() {
        let json = FormBlueprint::from_json(SIGNUP).unwrap().to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let kinds: Vec<&str> = value["fields"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|field| field["kind"].as_str())
            .collect();
        assert_eq!(kinds, ["input", "switch", "slider", "tooltip", "button", "submit"]);
        assert_eq!(value["form"]["form_color"], "#ffffff");
    }
}
