use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use super::bullets;
use crate::mcp::context::RequestContext;
use crate::mcp::protocol::{Tool, ToolContent};
use crate::mcp::registry::ToolHandler;
use crate::mcp::tokens;

const TOPICS: &[&str] = &[
    "colors", "typography", "spacing", "shadows", "blur", "animations", "gestures", "haptics",
    "navigation", "accessibility", "layout", "iconography", "buttons", "forms", "modals", "lists",
    "dark-mode", "principles",
];

struct Guideline {
    title: &'static str,
    description: &'static str,
    dos: &'static [&'static str],
    donts: &'static [&'static str],
}

struct CodeExample {
    platform: &'static str,
    description: &'static str,
    code: &'static str,
}

struct Guide {
    title: &'static str,
    principles: &'static [&'static str],
    guidelines: &'static [Guideline],
    examples: &'static [CodeExample],
    references: &'static [&'static str],
    tokens: Option<fn() -> Value>,
}

const SWIFTUI_COLOR_EXAMPLE: CodeExample = CodeExample {
    platform: "SwiftUI",
    description: "SwiftUI semantic color usage",
    code: "Text(\"Hello\")\n    .foregroundStyle(.primary)\n\nButton(\"Action\") { }\n    .tint(.blue)",
};

const CSS_DARK_MODE_EXAMPLE: CodeExample = CodeExample {
    platform: "CSS",
    description: "CSS custom properties for Apple system colors",
    code: ":root {\n  --system-blue: #007AFF;\n  --background-primary: #FFFFFF;\n}\n\n@media (prefers-color-scheme: dark) {\n  :root {\n    --system-blue: #0A84FF;\n    --background-primary: #000000;\n  }\n}",
};

fn all_colors() -> Value {
    tokens::colors("all").unwrap_or(Value::Null)
}

fn semantic_colors() -> Value {
    tokens::colors("semantic").unwrap_or(Value::Null)
}

fn all_typography() -> Value {
    tokens::typography("all").unwrap_or(Value::Null)
}

fn guide_for(topic: &str) -> Guide {
    match topic {
        "colors" => Guide {
            title: "Colors",
            principles: &[
                "Use system colors to ensure consistency across iOS/macOS",
                "Semantic colors automatically adapt to light/dark mode",
                "Maintain sufficient contrast for accessibility (4.5:1 for text)",
                "Use vibrant colors sparingly as accents",
            ],
            guidelines: &[
                Guideline {
                    title: "System Colors",
                    description: "Apple provides a set of system colors that are optimized for both light and dark modes.",
                    dos: &["Use system blue (#007AFF) for primary actions and links", "Use system red (#FF3B30) for destructive actions"],
                    donts: &["Hardcode colors that clash with system UI", "Use pure black on pure white for text"],
                },
                Guideline {
                    title: "Semantic Colors",
                    description: "Semantic colors have meaning and adapt to context.",
                    dos: &["Use label.primary for main text content", "Use separator colors for divider lines"],
                    donts: &["Use semantic colors for decorative purposes"],
                },
            ],
            examples: &[CSS_DARK_MODE_EXAMPLE, SWIFTUI_COLOR_EXAMPLE],
            references: &["Human Interface Guidelines > Foundations > Color", "Human Interface Guidelines > Color > Dark Mode"],
            tokens: Some(all_colors),
        },
        "typography" => Guide {
            title: "Typography",
            principles: &[
                "Use the system font (SF Pro) for a native feel",
                "Body text is 17pt on iOS and 13pt on macOS",
                "Support Dynamic Type so text scales with user preferences",
            ],
            guidelines: &[Guideline {
                title: "Type Scale",
                description: "The built-in text styles establish hierarchy without custom sizes.",
                dos: &["Use text styles like .headline and .body", "Prefer regular, medium or semibold weights"],
                donts: &["Use font sizes below 11pt", "Use ultralight or thin weights for body text"],
            }],
            examples: &[CodeExample {
                platform: "CSS",
                description: "System font stack",
                code: "body {\n  font-family: -apple-system, BlinkMacSystemFont, system-ui, sans-serif;\n  font-size: 17px;\n  -webkit-font-smoothing: antialiased;\n}",
            }],
            references: &["Human Interface Guidelines > Foundations > Typography"],
            tokens: Some(all_typography),
        },
        "spacing" | "layout" => Guide {
            title: "Spacing & Layout",
            principles: &[
                "Lay out on an 8pt grid with 4pt for fine adjustments",
                "Keep 16pt screen margins on compact widths, 20pt on regular",
                "Respect safe areas on every edge",
            ],
            guidelines: &[Guideline {
                title: "Grid",
                description: "Consistent multiples of the base unit create rhythm.",
                dos: &["Use 4, 8, 12, 16, 24, 32, 48 and 64", "Keep touch targets at least 44x44pt"],
                donts: &["Mix arbitrary values like 7px or 13px", "Place controls under the home indicator"],
            }],
            examples: &[CodeExample {
                platform: "CSS",
                description: "Safe-area aware padding",
                code: ".screen {\n  padding: 16px;\n  padding-bottom: max(16px, env(safe-area-inset-bottom));\n}",
            }],
            references: &["Human Interface Guidelines > Foundations > Layout"],
            tokens: Some(tokens::spacing),
        },
        "shadows" => Guide {
            title: "Shadows & Elevation",
            principles: &["Use soft, diffuse shadows", "Elevation communicates hierarchy, not decoration"],
            guidelines: &[Guideline {
                title: "Elevation Levels",
                description: "Five levels from flat to focused dialogs.",
                dos: &["Use level 1 for cards", "Use level 3 for sheets and modals"],
                donts: &["Stack several hard shadows", "Use shadows on every element"],
            }],
            examples: &[CodeExample {
                platform: "CSS",
                description: "Card elevation",
                code: ".card {\n  box-shadow: 0 1px 3px rgba(0, 0, 0, 0.12);\n}",
            }],
            references: &["Human Interface Guidelines > Foundations > Materials"],
            tokens: Some(tokens::shadows),
        },
        "blur" => Guide {
            title: "Blur & Materials",
            principles: &["Materials create depth while keeping context visible", "Prefer thicker materials behind text"],
            guidelines: &[Guideline {
                title: "Materials",
                description: "Translucent layers blur the content beneath them.",
                dos: &["Use chrome material for navigation bars", "Provide an opaque fallback"],
                donts: &["Put small text on ultra-thin material"],
            }],
            examples: &[CodeExample {
                platform: "CSS",
                description: "Regular material",
                code: ".bar {\n  backdrop-filter: blur(30px) saturate(180%);\n  background-color: rgba(255, 255, 255, 0.8);\n}",
            }],
            references: &["Human Interface Guidelines > Foundations > Materials"],
            tokens: Some(tokens::materials),
        },
        "animations" => Guide {
            title: "Animations",
            principles: &["Motion should be purposeful and quick", "Prefer springs for natural movement", "Always honour reduced motion"],
            guidelines: &[Guideline {
                title: "Springs",
                description: "Springs carry velocity and feel physical.",
                dos: &["Use response 0.3 to 0.55 for UI feedback", "Cross-fade when reduced motion is on"],
                donts: &["Animate for longer than 0.5s without reason", "Block input while animating"],
            }],
            examples: &[CodeExample {
                platform: "SwiftUI",
                description: "Spring animation",
                code: "withAnimation(.spring(response: 0.3, dampingFraction: 0.825)) {\n    isExpanded.toggle()\n}",
            }],
            references: &["Human Interface Guidelines > Foundations > Motion"],
            tokens: Some(tokens::animations),
        },
        "gestures" | "haptics" => Guide {
            title: "Gestures & Haptics",
            principles: &["Standard gestures behave the same everywhere", "Haptics confirm, they never surprise"],
            guidelines: &[Guideline {
                title: "Feedback",
                description: "Pair interactions with matching visual and tactile feedback.",
                dos: &["Use selection haptics for pickers", "Keep swipe-to-go-back working"],
                donts: &["Override system edge gestures", "Fire haptics on every scroll tick"],
            }],
            examples: &[CodeExample {
                platform: "SwiftUI",
                description: "Sensory feedback",
                code: "Toggle(\"Wi-Fi\", isOn: $isOn)\n    .sensoryFeedback(.selection, trigger: isOn)",
            }],
            references: &["Human Interface Guidelines > Inputs > Gestures", "Human Interface Guidelines > Inputs > Haptics"],
            tokens: None,
        },
        "navigation" => Guide {
            title: "Navigation",
            principles: &["People should always know where they are", "Use tab bars for top-level sections"],
            guidelines: &[Guideline {
                title: "Hierarchy",
                description: "Navigation stacks for drill-down, tab bars for peers.",
                dos: &["Use large titles at the root", "Keep back titles short"],
                donts: &["Use more than five tabs", "Hide the tab bar on drill-down"],
            }],
            examples: &[CodeExample {
                platform: "SwiftUI",
                description: "Tab and stack navigation",
                code: "TabView {\n    NavigationStack { Library() }\n        .tabItem { Label(\"Library\", systemImage: \"books.vertical\") }\n}",
            }],
            references: &["Human Interface Guidelines > Components > Navigation and search"],
            tokens: None,
        },
        "accessibility" => Guide {
            title: "Accessibility",
            principles: &["Every control needs a label", "Contrast of at least 4.5:1 for text", "Touch targets of at least 44x44pt"],
            guidelines: &[Guideline {
                title: "Assistive Technologies",
                description: "VoiceOver, Dynamic Type and reduced motion must all work.",
                dos: &["Label icon-only buttons", "Test with the largest text size"],
                donts: &["Convey meaning with color alone", "Truncate essential text"],
            }],
            examples: &[CodeExample {
                platform: "React",
                description: "Labelled icon button",
                code: "<button aria-label=\"Close\" onClick={onClose}>\n  <XIcon aria-hidden=\"true\" />\n</button>",
            }],
            references: &["Human Interface Guidelines > Foundations > Accessibility"],
            tokens: None,
        },
        "iconography" => Guide {
            title: "Iconography",
            principles: &["Prefer SF Symbols", "Match symbol weight to adjacent text"],
            guidelines: &[Guideline {
                title: "Symbols",
                description: "Symbols scale with text and adapt to weight.",
                dos: &["Use filled variants in tab bars", "Keep glyphs simple"],
                donts: &["Mix icon families", "Use icons without labels for uncommon actions"],
            }],
            examples: &[CodeExample {
                platform: "SwiftUI",
                description: "SF Symbol with label",
                code: "Label(\"Favorites\", systemImage: \"star.fill\")",
            }],
            references: &["Human Interface Guidelines > Foundations > SF Symbols"],
            tokens: None,
        },
        "buttons" => Guide {
            title: "Buttons",
            principles: &["One prominent action per view", "Button titles are verbs"],
            guidelines: &[Guideline {
                title: "Styles",
                description: "Filled, tinted, gray and plain styles signal importance.",
                dos: &["Use the filled style for the primary action", "Use red only for destructive actions"],
                donts: &["Show several filled buttons side by side", "Make buttons smaller than 44pt"],
            }],
            examples: &[CodeExample {
                platform: "SwiftUI",
                description: "Prominent button",
                code: "Button(\"Continue\") { next() }\n    .buttonStyle(.borderedProminent)",
            }],
            references: &["Human Interface Guidelines > Components > Buttons"],
            tokens: None,
        },
        "forms" => Guide {
            title: "Forms",
            principles: &["Ask only for what you need", "Validate inline and early"],
            guidelines: &[Guideline {
                title: "Fields",
                description: "Grouped inset lists keep forms scannable.",
                dos: &["Use the right keyboard type", "Show errors next to the field"],
                donts: &["Use placeholder text as the only label", "Clear input on error"],
            }],
            examples: &[CodeExample {
                platform: "SwiftUI",
                description: "Grouped form",
                code: "Form {\n    TextField(\"Email\", text: $email)\n        .keyboardType(.emailAddress)\n}",
            }],
            references: &["Human Interface Guidelines > Components > Text fields"],
            tokens: None,
        },
        "modals" => Guide {
            title: "Modals & Sheets",
            principles: &["Modality interrupts, so use it sparingly", "Always provide an obvious way out"],
            guidelines: &[Guideline {
                title: "Sheets",
                description: "Sheets hold focused, self-contained tasks.",
                dos: &["Use detents for partial sheets", "Put Cancel on the leading side"],
                donts: &["Stack sheets on sheets", "Use alerts for non-critical information"],
            }],
            examples: &[CodeExample {
                platform: "SwiftUI",
                description: "Half-height sheet",
                code: ".sheet(isPresented: $showing) {\n    Details().presentationDetents([.medium, .large])\n}",
            }],
            references: &["Human Interface Guidelines > Components > Sheets"],
            tokens: None,
        },
        "lists" => Guide {
            title: "Lists",
            principles: &["Rows are at least 44pt tall", "Use insets and grouping for structure"],
            guidelines: &[Guideline {
                title: "Rows",
                description: "Lists present rows of related data in one column.",
                dos: &["Support swipe actions for common tasks", "Use disclosure indicators for drill-down"],
                donts: &["Put more than two lines of text in a row", "Hide destructive actions without confirmation"],
            }],
            examples: &[CodeExample {
                platform: "SwiftUI",
                description: "Inset grouped list",
                code: "List(items) { item in\n    Text(item.title)\n}\n.listStyle(.insetGrouped)",
            }],
            references: &["Human Interface Guidelines > Components > Lists and tables"],
            tokens: Some(tokens::spacing_components),
        },
        "dark-mode" => Guide {
            title: "Dark Mode",
            principles: &["Dark mode is a first-class appearance", "Semantic colors do most of the work"],
            guidelines: &[Guideline {
                title: "Appearance",
                description: "Backgrounds go dark and elevated surfaces get lighter.",
                dos: &["Test both appearances", "Use the dark variants of system colors"],
                donts: &["Invert colors mechanically", "Use pure white text on pure black at large sizes"],
            }],
            examples: &[CSS_DARK_MODE_EXAMPLE, SWIFTUI_COLOR_EXAMPLE],
            references: &["Human Interface Guidelines > Foundations > Dark Mode"],
            tokens: Some(semantic_colors),
        },
        _ => Guide {
            title: "Design Principles",
            principles: &[
                "Aesthetic Integrity - Design should complement app functionality",
                "Consistency - Use standard UI elements and patterns",
                "Direct Manipulation - Users should feel directly connected to content",
                "Feedback - Every action should have a clear response",
                "User Control - Users should initiate and control actions",
            ],
            guidelines: &[
                Guideline {
                    title: "Clarity",
                    description: "Text is legible at every size and icons are precise.",
                    dos: &["Use negative space to focus attention"],
                    donts: &["Use small, low-contrast text", "Create cluttered layouts"],
                },
                Guideline {
                    title: "Deference",
                    description: "The interface helps people understand content without competing with it.",
                    dos: &["Let content fill the screen"],
                    donts: &["Let UI compete with content", "Use heavy borders and bright chrome"],
                },
            ],
            examples: &[],
            references: &["Human Interface Guidelines > Foundations > Design Principles"],
            tokens: None,
        },
    }
}

fn default_platform() -> String {
    "all".to_string()
}

fn default_format() -> String {
    "detailed".to_string()
}

fn enabled() -> bool {
    true
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Args {
    topic: String,
    #[serde(default = "default_platform")]
    platform: String,
    #[serde(default = "enabled")]
    include_examples: bool,
    #[serde(default = "default_format")]
    format: String,
}

fn example_matches(example: &CodeExample, platform: &str) -> bool {
    match platform {
        "ios" | "macos" => example.platform == "SwiftUI",
        "web" => example.platform != "SwiftUI",
        _ => true,
    }
}

/// Look up Apple design guidance for a topic
pub struct StyleGuideTool;

#[async_trait]
impl ToolHandler for StyleGuideTool {
    async fn execute(&self, args: Value, context: &RequestContext) -> Result<ToolContent, String> {
        let params: Args =
            serde_json::from_value(args).map_err(|e| format!("Invalid arguments: {}", e))?;

        let guide = guide_for(&params.topic);
        tracing::debug!(
            user = context.user_label(),
            topic = %params.topic,
            platform = %params.platform,
            "Style guide lookup"
        );

        Ok(ToolContent::Text {
            text: render(&guide, &params)?,
        })
    }

    fn schema(&self) -> Tool {
        Tool {
            name: "get_style_guide".to_string(),
            description: "Get Apple Human Interface Guidelines guidance, tokens and code examples for a design topic".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "topic": {
                        "type": "string",
                        "enum": TOPICS,
                        "description": "Topic to get guidance on"
                    },
                    "platform": {
                        "type": "string",
                        "enum": ["ios", "macos", "web", "all"],
                        "description": "Target platform (default: all)"
                    },
                    "includeExamples": {
                        "type": "boolean",
                        "description": "Include code examples (default: true)"
                    },
                    "format": {
                        "type": "string",
                        "enum": ["detailed", "summary"],
                        "description": "Response format (default: detailed)"
                    }
                },
                "required": ["topic"]
            }),
        }
    }
}

fn render(guide: &Guide, args: &Args) -> Result<String, String> {
    let detailed = args.format != "summary";
    let mut output = format!("# {} - Apple Design Guidelines\n\n", guide.title);
    output.push_str(&format!("## Core Principles\n{}\n\n", bullets(guide.principles)));

    if detailed {
        for g in guide.guidelines {
            output.push_str(&format!(
                "## {}\n{}\n\n### Do\n{}\n\n### Don't\n{}\n\n",
                g.title,
                g.description,
                bullets(g.dos),
                bullets(g.donts)
            ));
        }
    }

    if args.include_examples {
        let examples: Vec<&CodeExample> = guide
            .examples
            .iter()
            .filter(|ex| example_matches(ex, &args.platform))
            .collect();
        if !examples.is_empty() {
            output.push_str("## Code Examples\n\n");
            for ex in examples {
                output.push_str(&format!(
                    "### {}\n{}\n```\n{}\n```\n\n",
                    ex.platform, ex.description, ex.code
                ));
            }
        }
    }

    if let (true, Some(producer)) = (detailed, guide.tokens) {
        let json = serde_json::to_string_pretty(&producer())
            .map_err(|e| format!("Failed to serialize tokens: {}", e))?;
        output.push_str(&format!("## Design Tokens\n```json\n{}\n```\n\n", json));
    }

    output.push_str(&format!("## HIG References\n{}", bullets(guide.references)));
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(topic: &str) -> Args {
        Args {
            topic: topic.to_string(),
            platform: "all".to_string(),
            include_examples: true,
            format: "detailed".to_string(),
        }
    }

    #[test]
    fn every_topic_renders() {
        for topic in TOPICS {
            let text = render(&guide_for(topic), &args(topic)).unwrap();
            assert!(text.contains("- Apple Design Guidelines"));
            assert!(text.contains("## HIG References"));
        }
    }

    #[test]
    fn summary_omits_guidelines_and_tokens() {
        let mut input = args("colors");
        input.format = "summary".to_string();
        let text = render(&guide_for("colors"), &input).unwrap();
        assert!(!text.contains("### Do"));
        assert!(!text.contains("## Design Tokens"));
    }

    #[test]
    fn platform_filters_examples() {
        let mut input = args("colors");
        input.platform = "ios".to_string();
        let text = render(&guide_for("colors"), &input).unwrap();
        assert!(text.contains("### SwiftUI"));
        assert!(!text.contains("### CSS"));
    }

    #[tokio::test]
    async fn execute_renders_topic_heading() {
        let result = StyleGuideTool
            .execute(json!({ "topic": "typography" }), &RequestContext::default())
            .await
            .unwrap();
        let ToolContent::Text { text } = result;
        assert!(text.starts_with("# Typography - Apple Design Guidelines"));
        assert!(text.contains("## Design Tokens"));
    }
}
