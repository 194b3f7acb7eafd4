use serde_json::{Map, Value};
use std::collections::HashMap;

use super::error::StartupError;
use super::protocol::{GetPromptResponse, Prompt, PromptArgument, PromptMessage, ToolContent};

/// String-only prompt arguments after filtering
pub type PromptArgs = HashMap<String, String>;

pub type Renderer = fn(&PromptArgs) -> String;

pub struct PromptDescriptor {
    pub name: &'static str,
    pub description: &'static str,
    pub arguments: &'static [(&'static str, &'static str, bool)],
    renderer: Renderer,
}

impl PromptDescriptor {
    fn listing(&self) -> Prompt {
        Prompt {
            name: self.name.to_string(),
            description: self.description.to_string(),
            arguments: self
                .arguments
                .iter()
                .map(|(name, description, required)| PromptArgument {
                    name: name.to_string(),
                    description: description.to_string(),
                    required: *required,
                })
                .collect(),
        }
    }
}

/// Named prompt templates
pub struct PromptCatalog {
    prompts: Vec<PromptDescriptor>,
}

impl PromptCatalog {
    pub fn empty() -> Self {
        Self {
            prompts: Vec::new(),
        }
    }

    pub fn register(&mut self, prompt: PromptDescriptor) -> Result<(), StartupError> {
        if self.prompts.iter().any(|p| p.name == prompt.name) {
            return Err(StartupError::Duplicate {
                kind: "prompt",
                name: prompt.name.to_string(),
            });
        }
        self.prompts.push(prompt);
        Ok(())
    }

    pub fn design_prompts() -> Result<Self, StartupError> {
        let mut catalog = Self::empty();
        catalog.register(PromptDescriptor {
            name: "review_component",
            description: "Review a UI component for Apple design compliance",
            arguments: &[
                ("componentCode", "The component code to review", true),
                ("componentType", "Type of component (button, card, modal, etc.)", true),
                ("platform", "Target platform (ios, macos, web)", true),
            ],
            renderer: render_review_component,
        })?;
        catalog.register(PromptDescriptor {
            name: "create_design_system",
            description: "Create a complete Apple-inspired design system for a project",
            arguments: &[
                ("projectType", "Type of project (mobile app, web app, desktop app)", true),
                ("brandColors", "Primary brand colors to incorporate (optional)", false),
                ("platforms", "Target platforms (ios, macos, web)", true),
            ],
            renderer: render_create_design_system,
        })?;
        catalog.register(PromptDescriptor {
            name: "accessibility_audit",
            description: "Audit a design or component for Apple accessibility guidelines",
            arguments: &[
                ("code", "The code to audit", true),
                ("platform", "Target platform (ios, macos, web)", true),
            ],
            renderer: render_accessibility_audit,
        })?;
        catalog.register(PromptDescriptor {
            name: "adapt_for_platform",
            description: "Adapt a design from one platform to another following Apple guidelines",
            arguments: &[
                ("sourceCode", "The source platform code", true),
                ("sourcePlatform", "Source platform (ios, macos, web, react, swiftui)", true),
                ("targetPlatform", "Target platform (ios, macos, web, react, swiftui)", true),
            ],
            renderer: render_adapt_for_platform,
        })?;
        Ok(catalog)
    }

    pub fn list(&self) -> Vec<Prompt> {
        self.prompts.iter().map(|p| p.listing()).collect()
    }

    pub fn count(&self) -> usize {
        self.prompts.len()
    }

    /// Render a prompt; `None` for an unknown name.
    ///
    /// Non-string argument values are dropped. Missing arguments render as
    /// empty text, required or not.
    pub fn get(&self, name: &str, arguments: Option<&Map<String, Value>>) -> Option<GetPromptResponse> {
        let prompt = self.prompts.iter().find(|p| p.name == name)?;

        let args: PromptArgs = arguments
            .map(|map| {
                map.iter()
                    .filter_map(|(k, v)| v.as_str().map(|s| (k.clone(), s.to_string())))
                    .collect()
            })
            .unwrap_or_default();

        Some(GetPromptResponse {
            description: prompt.description.to_string(),
            messages: vec![PromptMessage {
                role: "user".to_string(),
                content: ToolContent::Text {
                    text: (prompt.renderer)(&args),
                },
            }],
        })
    }
}

fn arg<'a>(args: &'a PromptArgs, name: &str) -> &'a str {
    args.get(name).map(String::as_str).unwrap_or("")
}

fn render_review_component(args: &PromptArgs) -> String {
    format!(
        r#"You are an Apple design expert reviewing a UI component for compliance with Human Interface Guidelines.

## Component Type
{component_type}

## Target Platform
{platform}

## Code to Review
```
{code}
```

Please analyze this component and provide:

1. **Overall Apple Design Compliance Score** (0-100)
2. **Visual Design Analysis**: colors, typography, spacing, shadows and depth
3. **Interaction Design Analysis**: feedback, animations, gestures
4. **Accessibility Considerations**: contrast, touch targets, screen readers, reduced motion
5. **Specific Improvements**: current snippet, suggested fix, relevant HIG section
6. **Positive Patterns**: what the component already does well

Focus on actionable, specific feedback that will make this component feel more "Apple-like.""#,
        component_type = arg(args, "componentType"),
        platform = arg(args, "platform"),
        code = arg(args, "componentCode"),
    )
}

fn render_create_design_system(args: &PromptArgs) -> String {
    let brand = match args.get("brandColors") {
        Some(colors) if !colors.is_empty() => format!("## Brand Colors\n{}\n", colors),
        _ => String::new(),
    };
    format!(
        r#"You are creating an Apple-inspired design system for a {project}.

## Target Platforms
{platforms}

{brand}
Please create a comprehensive design system including:

## 1. Color Tokens
System, semantic and accent colors with light and dark variants.

## 2. Typography Scale
SF Pro font stack, the full type scale, weights, line heights and tracking.

## 3. Spacing System
8pt grid, spacing scale, component spacing and touch targets.

## 4. Shadow/Elevation System
4-5 elevation levels with light and dark values.

## 5. Animation System
Spring configurations, timing curves and reduced motion alternatives.

## 6. Component Specifications
Button, Card, Input, Toggle and Modal with all interaction states.

## 7. Accessibility Guidelines
Contrast, touch targets, screen readers and Dynamic Type.

Provide all values in formats usable for {platforms} development."#,
        project = arg(args, "projectType"),
        platforms = arg(args, "platforms"),
        brand = brand,
    )
}

fn render_accessibility_audit(args: &PromptArgs) -> String {
    let platform = arg(args, "platform");
    let screen_reader = if platform == "ios" || platform == "macos" {
        "- VoiceOver labels for all interactive elements\n- Proper accessibility traits\n- Logical reading order"
    } else {
        "- ARIA labels and roles\n- Semantic HTML elements\n- Logical tab order and focus management"
    };
    format!(
        r#"You are an accessibility expert auditing a {platform} component for Apple accessibility compliance.

## Code to Audit
```
{code}
```

## 1. Color Contrast
Minimum 4.5:1 for normal text, 3:1 for large text and UI components.

## 2. Touch/Click Targets
Minimum 44x44 points with adequate spacing.

## 3. Screen Reader Compatibility
{screen_reader}

## 4. Dynamic Type Support
## 5. Reduced Motion Support
## 6. High Contrast Support

For each issue give: the issue, its impact, the current code, the fix and how to verify it."#,
        platform = platform,
        code = arg(args, "code"),
        screen_reader = screen_reader,
    )
}

fn render_adapt_for_platform(args: &PromptArgs) -> String {
    let source = arg(args, "sourcePlatform");
    let target = arg(args, "targetPlatform");
    let considerations = match target {
        "ios" | "swiftui" => "**iOS/SwiftUI Target:**\n- Use SwiftUI's built-in components and modifiers\n- Use system materials for blur\n- Follow iOS navigation patterns (NavigationStack, TabView)\n- Support Dynamic Type",
        "macos" => "**macOS Target:**\n- Adapt for pointer interaction (hover states)\n- Use the sidebar navigation pattern\n- Support keyboard shortcuts",
        "web" | "react" => "**Web/React Target:**\n- Use CSS custom properties for theming\n- Add keyboard navigation and ARIA attributes\n- Use media queries for dark mode and reduced motion",
        _ => "",
    };
    format!(
        r#"You are adapting a UI component from {source} to {target} following Apple design guidelines.

## Source Code ({source})
```
{code}
```

## Platform-Specific Considerations
{considerations}

## Adaptation Tasks
1. Map patterns specific to {source} onto {target}
2. Adjust typography, spacing, colors and elevation
3. Adapt input methods, gestures and feedback
4. Provide the transformed code with accessibility features
5. Explain each significant change

Provide the complete adapted code ready for use on {target}."#,
        source = source,
        target = target,
        code = arg(args, "sourceCode"),
        considerations = considerations,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn catalog() -> PromptCatalog {
        PromptCatalog::design_prompts().unwrap()
    }

    fn text(response: &GetPromptResponse) -> &str {
        let ToolContent::Text { text } = &response.messages[0].content;
        text
    }

    #[test]
    fn lists_four_prompts_in_order() {
        let names: Vec<String> = catalog().list().into_iter().map(|p| p.name).collect();
        assert_eq!(
            names,
            vec!["review_component", "create_design_system", "accessibility_audit", "adapt_for_platform"]
        );
    }

    #[test]
    fn unknown_prompt_is_none() {
        assert!(catalog().get("bogus", None).is_none());
    }

    #[test]
    fn renders_string_arguments() {
        let args = json!({ "componentType": "button", "platform": "ios", "componentCode": "<b/>" });
        let response = catalog()
            .get("review_component", args.as_object())
            .unwrap();
        assert_eq!(response.messages[0].role, "user");
        let rendered = text(&response);
        assert!(rendered.contains("## Component Type\nbutton"));
        assert!(rendered.contains("<b/>"));
    }

    #[test]
    fn drops_non_string_arguments() {
        let args = json!({ "code": 42, "platform": "web" });
        let response = catalog()
            .get("accessibility_audit", args.as_object())
            .unwrap();
        let rendered = text(&response);
        assert!(!rendered.contains("42"));
        assert!(rendered.contains("auditing a web component"));
        assert!(rendered.contains("ARIA labels"));
    }

    #[test]
    fn optional_brand_colors_section() {
        let catalog = catalog();
        let without = catalog
            .get("create_design_system", json!({ "projectType": "web app" }).as_object())
            .unwrap();
        assert!(!text(&without).contains("## Brand Colors"));

        let with = catalog
            .get(
                "create_design_system",
                json!({ "projectType": "web app", "brandColors": "#FF6600" }).as_object(),
            )
            .unwrap();
        assert!(text(&with).contains("## Brand Colors\n#FF6600"));
    }
}
