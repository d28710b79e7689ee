//! Presentation fragments: how the loaded families are applied
//!
//! Three generation modes share one structured representation:
//! default theme variables, user CSS, and force (every declaration marked
//! `!important` plus a blanket rule on all elements).

use tracing::{debug, warn};

use crate::config::{PresentationConfig, PresentationMode};
use crate::constants::theme::{FAMILY_CLASS_PREFIX, FONT_VARIABLES};
use crate::css::{quote_family, Rule, Stylesheet};
use crate::font::asset::family_class;

/// Generated text for the general slot and, in force mode, the force slot
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PresentationFragment {
    pub general: String,
    pub force: Option<String>,
}

/// `:root` (or a per-family class) rule assigning the family to the theme variables
pub fn variables_rule(selector: &str, family: &str) -> Rule {
    let quoted = quote_family(family);
    FONT_VARIABLES
        .iter()
        .fold(Rule::new(selector), |rule, var| rule.declare(*var, quoted.clone()))
}

/// Selector scoping one family in batch mode
pub fn family_selector(family: &str) -> String {
    format!(".{}{}", FAMILY_CLASS_PREFIX, family_class(family))
}

/// Blanket rule forcing the families onto every element
pub fn force_rule(families: &[String]) -> Rule {
    let stack = families.iter().map(|f| quote_family(f)).collect::<Vec<_>>().join(", ");
    Rule::new("*")
        .comment("Force style for all elements")
        .declare_important("font-family", stack)
}

/// Build the presentation for the given families.
///
/// A blank custom CSS field falls back to default mode; callers surface the
/// validation message. An empty family list yields an empty fragment.
pub fn build_presentation_fragment(families: &[String], config: &PresentationConfig) -> PresentationFragment {
    let families = dedup(families);
    if families.is_empty() {
        return PresentationFragment::default();
    }

    let mode = if config.custom_css_missing() {
        PresentationMode::Default
    } else {
        config.mode()
    };

    let general = match mode {
        PresentationMode::Default => {
            let mut sheet = default_sheet(&families);
            if config.force_mode {
                sheet.mark_important();
            }
            sheet.to_string()
        }
        PresentationMode::Custom => {
            if config.force_mode {
                force_custom(&config.custom_css)
            } else {
                config.custom_css.clone()
            }
        }
    };

    let force = config.force_mode.then(|| force_rule(&families).to_string());

    debug!(families = ?families, mode = ?mode, force = config.force_mode, "Built presentation fragment");
    PresentationFragment { general, force }
}

fn default_sheet(families: &[String]) -> Stylesheet {
    let mut sheet = Stylesheet::new();
    if let [family] = families {
        sheet.push(variables_rule(":root", family));
    } else {
        // Scoped per family so several fonts can coexist
        for family in families {
            sheet.push(variables_rule(&family_selector(family), family));
        }
    }
    sheet
}

/// Mark every declaration of user CSS important, including rules nested in
/// at-rule blocks. Text the parser cannot read is kept verbatim.
fn force_custom(custom_css: &str) -> String {
    match Stylesheet::parse(custom_css) {
        Some(mut sheet) => {
            sheet.mark_important();
            sheet.to_string()
        }
        None => {
            warn!("Custom CSS could not be parsed, leaving it unforced");
            custom_css.to_string()
        }
    }
}

fn dedup(families: &[String]) -> Vec<String> {
    let mut seen = Vec::with_capacity(families.len());
    for family in families {
        if !seen.contains(family) {
            seen.push(family.clone());
        }
    }
    seen
}

#[cfg(test)]
mod tests {
    use super::*;

    fn families(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn count_declarations(sheet: &Stylesheet) -> usize {
        sheet.rules().iter().map(|r| r.declarations.len()).sum()
    }

    #[test]
    fn test_default_single_family_assigns_root_variables() {
        let fragment = build_presentation_fragment(&families(&["myfont"]), &PresentationConfig::default());

        assert!(fragment.general.starts_with(":root {"));
        for var in FONT_VARIABLES {
            assert!(fragment.general.contains(&format!("{}: 'myfont';", var)), "missing {var}");
        }
        assert_eq!(fragment.force, None);
        assert!(!fragment.general.contains("!important"));
    }

    #[test]
    fn test_default_batch_scopes_each_family() {
        let fragment =
            build_presentation_fragment(&families(&["vazir", "sahel bold"]), &PresentationConfig::default());

        assert!(!fragment.general.contains(":root"));
        assert!(fragment.general.contains(".custom-font-vazir {"));
        assert!(fragment.general.contains(".custom-font-sahel-bold {"));
        assert!(fragment.general.contains("--font-default: 'sahel bold';"));
    }

    #[test]
    fn test_custom_css_verbatim() {
        let config = PresentationConfig {
            custom_css_enabled: true,
            custom_css: ".cm-line { font-family: vazir }".to_string(),
            ..PresentationConfig::default()
        };
        let fragment = build_presentation_fragment(&families(&["vazir"]), &config);
        assert_eq!(fragment.general, ".cm-line { font-family: vazir }");
    }

    #[test]
    fn test_blank_custom_css_falls_back_to_default() {
        let config = PresentationConfig {
            custom_css_enabled: true,
            custom_css: "   ".to_string(),
            ..PresentationConfig::default()
        };
        let fragment = build_presentation_fragment(&families(&["vazir"]), &config);
        assert!(fragment.general.contains("--font-family-editor: 'vazir';"));
    }

    #[test]
    fn test_force_marks_every_declaration_once() {
        let plain = build_presentation_fragment(&families(&["a", "b"]), &PresentationConfig::default());
        let config = PresentationConfig {
            force_mode: true,
            ..PresentationConfig::default()
        };
        let forced = build_presentation_fragment(&families(&["a", "b"]), &config);

        let plain_sheet = Stylesheet::parse(&plain.general).unwrap();
        let forced_sheet = Stylesheet::parse(&forced.general).unwrap();
        assert_eq!(count_declarations(&plain_sheet), count_declarations(&forced_sheet));
        assert!(forced_sheet
            .rules()
            .iter()
            .flat_map(|r| &r.declarations)
            .all(|d| d.important));
        assert!(!forced.general.contains("!important !important"));

        let force = forced.force.unwrap();
        assert!(force.contains("* {"));
        assert!(force.contains("font-family: 'a', 'b' !important;"));
    }

    #[test]
    fn test_force_custom_css_no_duplicate_markers() {
        let config = PresentationConfig {
            force_mode: true,
            custom_css_enabled: true,
            custom_css: "body { font-family: x !important; font-size: 16px; }".to_string(),
            ..PresentationConfig::default()
        };
        let fragment = build_presentation_fragment(&families(&["x"]), &config);

        assert_eq!(fragment.general.matches("!important").count(), 2);
        assert!(fragment.general.contains("font-size: 16px !important;"));
    }

    #[test]
    fn test_force_custom_css_marks_nested_blocks() {
        let config = PresentationConfig {
            force_mode: true,
            custom_css_enabled: true,
            custom_css: "@import url(theme.css);\nbody { font-family: vazir; }\n\
                         @media print { body { font-size: 12px; } }"
                .to_string(),
            ..PresentationConfig::default()
        };
        let fragment = build_presentation_fragment(&families(&["vazir"]), &config);

        assert!(fragment.general.starts_with("@import url(theme.css);\n"));
        assert!(fragment.general.contains("font-family: vazir !important;"));
        assert!(fragment.general.contains("font-size: 12px !important;"));
        assert_eq!(fragment.general.matches("!important").count(), 2);
        assert!(fragment.force.is_some());
    }

    #[test]
    fn test_force_custom_css_unparseable_kept_verbatim() {
        let custom = "body { color: black;";
        let config = PresentationConfig {
            force_mode: true,
            custom_css_enabled: true,
            custom_css: custom.to_string(),
            ..PresentationConfig::default()
        };
        let fragment = build_presentation_fragment(&families(&["x"]), &config);
        assert_eq!(fragment.general, custom);
        assert!(fragment.force.is_some());
    }

    #[test]
    fn test_empty_families_yield_empty_fragment() {
        let fragment = build_presentation_fragment(&[], &PresentationConfig::default());
        assert_eq!(fragment, PresentationFragment::default());
    }

    #[test]
    fn test_duplicate_families_emit_one_rule() {
        let fragment =
            build_presentation_fragment(&families(&["a", "a"]), &PresentationConfig::default());
        assert!(fragment.general.starts_with(":root {"));
    }
}
