use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use super::bullets;
use crate::mcp::context::RequestContext;
use crate::mcp::protocol::{Tool, ToolContent};
use crate::mcp::registry::ToolHandler;
use crate::mcp::tokens;

const COMPONENT_TYPES: &[&str] = &[
    "button", "card", "modal", "navigation-bar", "tab-bar", "sidebar", "list", "form-input",
    "toggle", "slider", "alert", "sheet", "menu", "toolbar", "search-bar", "segmented-control",
    "stepper", "picker", "avatar", "badge", "tooltip", "checkbox", "radio-group", "textarea",
    "progress-ring", "skeleton", "toast", "accordion", "divider", "breadcrumb",
];

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Customizations {
    primary_color: Option<String>,
    rounded_corners: Option<String>,
    shadow_level: Option<u8>,
}

fn default_variant() -> String {
    "default".to_string()
}

fn enabled() -> bool {
    true
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Args {
    component_type: String,
    platform: String,
    #[serde(default = "default_variant")]
    variant: String,
    #[serde(default = "enabled")]
    dark_mode_support: bool,
    #[serde(default = "enabled")]
    include_animations: bool,
    #[serde(default)]
    customizations: Customizations,
}

/// Resolved visual parameters shared by every platform template
struct Look {
    name: String,
    accent_light: String,
    accent_dark: String,
    filled: bool,
    radius: &'static str,
    shadow: &'static str,
}

impl Look {
    fn from_args(args: &Args) -> Self {
        let color = if args.variant == "destructive" { "red" } else { "blue" };
        let (light, dark) = tokens::system_color(color).unwrap_or(("#007AFF", "#0A84FF"));
        let accent_light = args
            .customizations
            .primary_color
            .clone()
            .unwrap_or_else(|| light.to_string());

        let radius = match args.customizations.rounded_corners.as_deref() {
            Some("none") => "0px",
            Some("small") => "6px",
            Some("medium") => "10px",
            Some("large") => "16px",
            Some("full") => "9999px",
            _ => "12px",
        };

        Self {
            name: pascal_case(&args.component_type),
            accent_light,
            accent_dark: dark.to_string(),
            filled: matches!(args.variant.as_str(), "prominent" | "destructive"),
            radius,
            shadow: tokens::shadow_level_css(args.customizations.shadow_level.unwrap_or(1)),
        }
    }
}

struct GeneratedComponent {
    language: &'static str,
    code: String,
    styles: Option<String>,
    usage: String,
    colors: Vec<String>,
    spacing: Vec<&'static str>,
    typography: Vec<&'static str>,
    notes: Vec<String>,
}

/// Generate Apple-styled UI component scaffolding
pub struct ComponentGeneratorTool;

#[async_trait]
impl ToolHandler for ComponentGeneratorTool {
    async fn execute(&self, args: Value, context: &RequestContext) -> Result<ToolContent, String> {
        let params: Args =
            serde_json::from_value(args).map_err(|e| format!("Invalid arguments: {}", e))?;

        if let Some(level) = params.customizations.shadow_level {
            if level > 4 {
                return Err(format!("shadowLevel must be between 0 and 4, got {}", level));
            }
        }

        let component = generate(&params);
        tracing::info!(
            user = context.user_label(),
            component = %params.component_type,
            platform = %params.platform,
            "Generated component"
        );

        Ok(ToolContent::Text {
            text: render(&component),
        })
    }

    fn schema(&self) -> Tool {
        Tool {
            name: "generate_component".to_string(),
            description: "Generate an Apple-styled UI component for React, SwiftUI, React Native, Tailwind or plain CSS".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "componentType": {
                        "type": "string",
                        "enum": COMPONENT_TYPES,
                        "description": "Type of component to generate"
                    },
                    "platform": {
                        "type": "string",
                        "enum": ["react", "swiftui", "react-native", "tailwind", "css"],
                        "description": "Target platform/framework"
                    },
                    "variant": {
                        "type": "string",
                        "enum": ["default", "prominent", "subtle", "destructive"],
                        "description": "Visual variant (default: default)"
                    },
                    "darkModeSupport": {
                        "type": "boolean",
                        "description": "Include dark mode styles (default: true)"
                    },
                    "includeAnimations": {
                        "type": "boolean",
                        "description": "Include Apple-style animations (default: true)"
                    },
                    "customizations": {
                        "type": "object",
                        "properties": {
                            "primaryColor": { "type": "string" },
                            "roundedCorners": {
                                "type": "string",
                                "enum": ["none", "small", "medium", "large", "full"]
                            },
                            "shadowLevel": { "type": "integer", "minimum": 0, "maximum": 4 }
                        }
                    }
                },
                "required": ["componentType", "platform"]
            }),
        }
    }
}

fn pascal_case(kebab: &str) -> String {
    kebab
        .split('-')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect()
}

fn generate(args: &Args) -> GeneratedComponent {
    let look = Look::from_args(args);
    let mut component = match args.platform.as_str() {
        "swiftui" => swiftui(&look, args),
        "tailwind" => tailwind(&look, args),
        "css" => css(&look, args),
        "react-native" => react_native(&look),
        _ => react(&look, args),
    };

    if args.include_animations && args.platform != "swiftui" {
        component
            .notes
            .push("Wrap transitions in a prefers-reduced-motion check for motion-sensitive users".to_string());
    }
    component
        .notes
        .push(format!("Minimum touch target is 44x44 points for the {}", args.component_type));
    component
}

fn css_rules(look: &Look, args: &Args) -> String {
    let class = args.component_type.as_str();
    let (background, foreground) = if look.filled {
        (look.accent_light.as_str(), "#FFFFFF")
    } else {
        ("var(--fill-secondary, rgba(120, 120, 128, 0.16))", look.accent_light.as_str())
    };

    let mut css = format!(
        ".{class} {{\n  font-family: {font};\n  font-size: 17px;\n  padding: 12px 20px;\n  min-height: 44px;\n  border-radius: {radius};\n  box-shadow: {shadow};\n  background: {background};\n  color: {foreground};\n",
        class = class,
        font = tokens::SYSTEM_FONT_STACK,
        radius = look.radius,
        shadow = look.shadow,
        background = background,
        foreground = foreground,
    );
    if args.include_animations {
        css.push_str("  transition: transform 0.2s cubic-bezier(0.25, 0.1, 0.25, 1.0), opacity 0.2s;\n");
    }
    css.push_str("}\n");
    if args.include_animations {
        css.push_str(&format!(".{}:active {{\n  transform: scale(0.97);\n}}\n", class));
        css.push_str(&format!(
            "@media (prefers-reduced-motion: reduce) {{\n  .{} {{ transition: none; }}\n}}\n",
            class
        ));
    }
    if args.dark_mode_support {
        let accent = if look.filled { "background" } else { "color" };
        css.push_str(&format!(
            "@media (prefers-color-scheme: dark) {{\n  .{} {{ {}: {}; }}\n}}\n",
            class, accent, look.accent_dark
        ));
    }
    css
}

fn react(look: &Look, args: &Args) -> GeneratedComponent {
    let code = format!(
        "import React from 'react';\nimport './{kebab}.css';\n\ninterface {name}Props {{\n  children?: React.ReactNode;\n  onClick?: () => void;\n  ariaLabel?: string;\n}}\n\nexport function {name}({{ children, onClick, ariaLabel }}: {name}Props) {{\n  return (\n    <div className=\"{kebab}\" role=\"group\" aria-label={{ariaLabel}} onClick={{onClick}}>\n      {{children}}\n    </div>\n  );\n}}",
        name = look.name,
        kebab = args.component_type,
    );
    GeneratedComponent {
        language: "tsx",
        code,
        styles: Some(css_rules(look, args)),
        usage: format!("<{name} ariaLabel=\"{name}\">Content</{name}>", name = look.name),
        colors: vec![look.accent_light.clone(), look.accent_dark.clone()],
        spacing: vec!["12px", "20px", "44px"],
        typography: vec!["body (17px)"],
        notes: vec!["Uses CSS custom properties so the host app can re-theme it".to_string()],
    }
}

fn tailwind(look: &Look, args: &Args) -> GeneratedComponent {
    let mut classes = vec![
        "font-sans".to_string(),
        "text-[17px]".to_string(),
        "px-5".to_string(),
        "py-3".to_string(),
        "min-h-[44px]".to_string(),
        format!("rounded-[{}]", look.radius),
    ];
    if look.filled {
        classes.push(format!("bg-[{}]", look.accent_light));
        classes.push("text-white".to_string());
    } else {
        classes.push("bg-gray-100".to_string());
        classes.push(format!("text-[{}]", look.accent_light));
    }
    if args.dark_mode_support {
        classes.push(if look.filled {
            format!("dark:bg-[{}]", look.accent_dark)
        } else {
            "dark:bg-neutral-800".to_string()
        });
    }
    if args.include_animations {
        classes.push("transition-transform".to_string());
        classes.push("active:scale-[0.97]".to_string());
        classes.push("motion-reduce:transition-none".to_string());
    }

    let code = format!(
        "export function {name}({{ children }}: {{ children?: React.ReactNode }}) {{\n  return (\n    <div className=\"{classes}\">\n      {{children}}\n    </div>\n  );\n}}",
        name = look.name,
        classes = classes.join(" "),
    );
    GeneratedComponent {
        language: "tsx",
        code,
        styles: None,
        usage: format!("<{name}>Content</{name}>", name = look.name),
        colors: vec![look.accent_light.clone(), look.accent_dark.clone()],
        spacing: vec!["px-5", "py-3", "min-h-[44px]"],
        typography: vec!["text-[17px]"],
        notes: vec!["Enable darkMode: 'media' in tailwind.config for the dark: variants".to_string()],
    }
}

fn css(look: &Look, args: &Args) -> GeneratedComponent {
    GeneratedComponent {
        language: "html",
        code: format!(
            "<div class=\"{kebab}\" role=\"group\" aria-label=\"{name}\">Content</div>",
            kebab = args.component_type,
            name = look.name
        ),
        styles: Some(css_rules(look, args)),
        usage: format!("Add class=\"{}\" to the element", args.component_type),
        colors: vec![look.accent_light.clone(), look.accent_dark.clone()],
        spacing: vec!["12px", "20px", "44px"],
        typography: vec!["body (17px)"],
        notes: vec![],
    }
}

fn swiftui(look: &Look, args: &Args) -> GeneratedComponent {
    let tint = if args.variant == "destructive" { ".red" } else { ".accentColor" };
    let mut modifiers = vec![
        ".font(.body)".to_string(),
        ".padding(.horizontal, 20)".to_string(),
        ".padding(.vertical, 12)".to_string(),
        ".frame(minHeight: 44)".to_string(),
    ];
    if look.filled {
        modifiers.push(format!(".background({})", tint));
        modifiers.push(".foregroundStyle(.white)".to_string());
    } else {
        modifiers.push(".background(.regularMaterial)".to_string());
        modifiers.push(format!(".foregroundStyle({})", tint));
    }
    modifiers.push(format!(
        ".clipShape(RoundedRectangle(cornerRadius: {}, style: .continuous))",
        look.radius.trim_end_matches("px")
    ));
    if args.include_animations {
        modifiers.push(".scaleEffect(isPressed ? 0.97 : 1)".to_string());
        modifiers.push(".animation(.spring(response: 0.3, dampingFraction: 0.825), value: isPressed)".to_string());
    }
    modifiers.push(format!(".accessibilityLabel(\"{}\")", look.name));

    let code = format!(
        "import SwiftUI\n\nstruct {name}<Content: View>: View {{\n    @State private var isPressed = false\n    let content: () -> Content\n\n    var body: some View {{\n        content()\n            {modifiers}\n    }}\n}}",
        name = look.name,
        modifiers = modifiers.join("\n            "),
    );
    GeneratedComponent {
        language: "swift",
        code,
        styles: None,
        usage: format!("{} {{ Text(\"Content\") }}", look.name),
        colors: vec![tint.to_string()],
        spacing: vec!["12pt", "20pt", "44pt"],
        typography: vec![".body"],
        notes: vec!["System colors and materials adapt to dark mode automatically".to_string()],
    }
}

fn react_native(look: &Look) -> GeneratedComponent {
    let background = if look.filled { look.accent_light.as_str() } else { "#F2F2F7" };
    let code = format!(
        "import {{ Pressable, StyleSheet, Text }} from 'react-native';\n\nexport function {name}({{ title, onPress }}: {{ title: string; onPress?: () => void }}) {{\n  return (\n    <Pressable accessibilityRole=\"button\" accessibilityLabel={{title}} onPress={{onPress}}\n      style={{({{ pressed }}) => [styles.container, pressed && {{ transform: [{{ scale: 0.97 }}] }}]}}>\n      <Text style={{styles.label}}>{{title}}</Text>\n    </Pressable>\n  );\n}}\n\nconst styles = StyleSheet.create({{\n  container: {{ minHeight: 44, paddingVertical: 12, paddingHorizontal: 20, borderRadius: {radius}, backgroundColor: '{background}' }},\n  label: {{ fontSize: 17, fontWeight: '600' }},\n}});",
        name = look.name,
        radius = look.radius.trim_end_matches("px"),
        background = background,
    );
    GeneratedComponent {
        language: "tsx",
        code,
        styles: None,
        usage: format!("<{} title=\"Continue\" onPress={{() => {{}}}} />", look.name),
        colors: vec![background.to_string()],
        spacing: vec!["12", "20", "44"],
        typography: vec!["17 / 600"],
        notes: vec!["Use useColorScheme() to swap colors in dark mode".to_string()],
    }
}

fn render(component: &GeneratedComponent) -> String {
    let mut output = format!(
        "# Generated Component\n\n## Code\n```{}\n{}\n```\n\n",
        component.language, component.code
    );
    if let Some(styles) = &component.styles {
        output.push_str(&format!("## Styles\n```css\n{}\n```\n\n", styles.trim_end()));
    }
    output.push_str(&format!("## Usage\n```tsx\n{}\n```\n\n", component.usage));

    let or_none = |items: Vec<String>| {
        if items.is_empty() {
            "None".to_string()
        } else {
            items.join(", ")
        }
    };
    output.push_str(&format!(
        "## Design Tokens Used\n- **Colors:** {}\n- **Spacing:** {}\n- **Typography:** {}\n\n",
        or_none(component.colors.clone()),
        or_none(component.spacing.iter().map(|s| s.to_string()).collect()),
        or_none(component.typography.iter().map(|s| s.to_string()).collect()),
    ));
    if !component.notes.is_empty() {
        output.push_str(&format!("## Notes\n{}", bullets(&component.notes)));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(component: &str, platform: &str, variant: &str) -> Args {
        Args {
            component_type: component.to_string(),
            platform: platform.to_string(),
            variant: variant.to_string(),
            dark_mode_support: true,
            include_animations: true,
            customizations: Customizations::default(),
        }
    }

    #[test]
    fn names_are_pascal_cased() {
        assert_eq!(pascal_case("search-bar"), "SearchBar");
        assert_eq!(pascal_case("button"), "Button");
    }

    #[test]
    fn destructive_variant_uses_system_red() {
        let component = generate(&args("button", "css", "destructive"));
        let styles = component.styles.unwrap();
        assert!(styles.contains("background: #FF3B30"));
        assert!(styles.contains("@media (prefers-color-scheme: dark)"));
    }

    #[test]
    fn dark_mode_can_be_disabled() {
        let mut input = args("card", "react", "default");
        input.dark_mode_support = false;
        let styles = generate(&input).styles.unwrap();
        assert!(!styles.contains("prefers-color-scheme"));
    }

    #[test]
    fn swiftui_has_accessibility_label() {
        let component = generate(&args("toggle", "swiftui", "default"));
        assert!(component.code.contains("struct Toggle<Content: View>: View"));
        assert!(component.code.contains(".accessibilityLabel(\"Toggle\")"));
    }

    #[tokio::test]
    async fn shadow_level_out_of_range_is_an_error() {
        let err = ComponentGeneratorTool
            .execute(
                json!({
                    "componentType": "card",
                    "platform": "css",
                    "customizations": { "shadowLevel": 9 }
                }),
                &RequestContext::default(),
            )
            .await
            .unwrap_err();
        assert!(err.contains("shadowLevel"));
    }

    #[tokio::test]
    async fn execute_renders_markdown() {
        let result = ComponentGeneratorTool
            .execute(
                json!({ "componentType": "button", "platform": "react" }),
                &RequestContext::default(),
            )
            .await
            .unwrap();
        let ToolContent::Text { text } = result;
        assert!(text.starts_with("# Generated Component\n\n## Code\n```tsx\n"));
        assert!(text.contains("export function Button("));
        assert!(text.contains("## Design Tokens Used"));
    }
}
