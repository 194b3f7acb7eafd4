use async_trait::async_trait;
use regex::Regex;
use serde::Deserialize;
use serde_json::{json, Value};

use super::bullets;
use crate::mcp::context::RequestContext;
use crate::mcp::protocol::{Tool, ToolContent};
use crate::mcp::registry::ToolHandler;
use crate::mcp::tokens;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Severity {
    Critical,
    Warning,
    Suggestion,
}

impl Severity {
    fn icon(self) -> &'static str {
        match self {
            Severity::Critical => "🔴",
            Severity::Warning => "🟡",
            Severity::Suggestion => "🔵",
        }
    }
}

#[derive(Debug, Clone)]
struct Issue {
    severity: Severity,
    category: &'static str,
    description: String,
    current_code: Option<String>,
    suggested_fix: String,
    hig_reference: &'static str,
}

#[derive(Debug, Default)]
struct ReviewReport {
    score: i32,
    issues: Vec<Issue>,
    positives: Vec<&'static str>,
    recommendations: Vec<&'static str>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Args {
    code: String,
    code_type: String,
    platform: String,
    #[serde(default)]
    focus_areas: Vec<String>,
    #[serde(default)]
    strict_mode: bool,
}

impl Args {
    fn checks(&self, area: &str) -> bool {
        self.focus_areas.is_empty() || self.focus_areas.iter().any(|a| a == area)
    }
}

/// Review UI code against the Human Interface Guidelines
pub struct DesignReviewTool;

#[async_trait]
impl ToolHandler for DesignReviewTool {
    async fn execute(&self, args: Value, context: &RequestContext) -> Result<ToolContent, String> {
        let params: Args =
            serde_json::from_value(args).map_err(|e| format!("Invalid arguments: {}", e))?;

        let report = review(&params);
        tracing::info!(
            user = context.user_label(),
            code_type = %params.code_type,
            score = report.score,
            issues = report.issues.len(),
            "Design review completed"
        );

        Ok(ToolContent::Text {
            text: render(&report),
        })
    }

    fn schema(&self) -> Tool {
        Tool {
            name: "review_design".to_string(),
            description: "Analyze UI code (CSS, React, SwiftUI, HTML, Tailwind) for Apple Human Interface Guidelines compliance and return a scored report".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "code": {
                        "type": "string",
                        "description": "The code to analyze"
                    },
                    "codeType": {
                        "type": "string",
                        "enum": ["css", "react", "swiftui", "html", "tailwind"],
                        "description": "Type of code"
                    },
                    "platform": {
                        "type": "string",
                        "enum": ["ios", "macos", "web", "cross-platform"],
                        "description": "Target platform"
                    },
                    "focusAreas": {
                        "type": "array",
                        "items": {
                            "type": "string",
                            "enum": ["colors", "typography", "spacing", "shadows", "animations", "layout", "accessibility", "navigation"]
                        },
                        "description": "Specific areas to focus the review on"
                    },
                    "strictMode": {
                        "type": "boolean",
                        "description": "Enforce strict HIG compliance (default: false)"
                    }
                },
                "required": ["code", "codeType", "platform"]
            }),
        }
    }
}

fn count(issues: &[Issue], severity: Severity) -> i32 {
    issues.iter().filter(|i| i.severity == severity).count() as i32
}

fn review(args: &Args) -> ReviewReport {
    let code = args.code.as_str();
    let mut report = ReviewReport {
        score: 100,
        ..Default::default()
    };

    if args.checks("colors") {
        let found = analyze_colors(code);
        report.score -= count(&found, Severity::Critical) * 15 + count(&found, Severity::Warning) * 5;
        report.issues.extend(found);
    }
    if args.checks("typography") {
        let found = analyze_typography(code);
        report.score -= count(&found, Severity::Critical) * 15 + count(&found, Severity::Warning) * 5;
        report.issues.extend(found);
    }
    if args.checks("spacing") {
        let found = analyze_spacing(code);
        report.score -= count(&found, Severity::Warning) * 3;
        report.issues.extend(found);
    }
    if args.checks("accessibility") {
        let found = analyze_accessibility(code, &args.code_type);
        report.score -= count(&found, Severity::Critical) * 20 + count(&found, Severity::Warning) * 8;
        report.issues.extend(found);
    }

    report.score = report.score.clamp(0, 100);
    report.positives = positive_patterns(code);
    report.recommendations = recommendations(args);
    report
}

/// Every `<prefix>: <n>px` match as (matched text, n)
fn px_values(code: &str, pattern: &str) -> Vec<(String, u32)> {
    let mut values = Vec::new();
    if let Ok(re) = Regex::new(pattern) {
        for caps in re.captures_iter(code) {
            if let Some(value) = caps.get(1).and_then(|m| m.as_str().parse::<u32>().ok()) {
                values.push((caps[0].to_string(), value));
            }
        }
    }
    values
}

fn analyze_colors(code: &str) -> Vec<Issue> {
    let mut issues = Vec::new();
    let patterns = [
        (r"#[0-9a-fA-F]{6}\b", "hex"),
        (r"rgb\(\s*\d+", "RGB"),
        (r"rgba\(\s*\d+", "RGBA"),
    ];

    for (pattern, label) in patterns {
        let Ok(re) = Regex::new(pattern) else {
            continue;
        };
        let custom: Vec<&str> = re
            .find_iter(code)
            .map(|m| m.as_str())
            .filter(|m| !tokens::is_system_color(m))
            .collect();
        if custom.is_empty() {
            continue;
        }
        issues.push(Issue {
            severity: Severity::Warning,
            category: "colors",
            description: format!(
                "Found {} hardcoded {} color(s). Consider using Apple system colors for consistency and dark mode support.",
                custom.len(),
                label
            ),
            current_code: Some(custom.iter().take(3).copied().collect::<Vec<_>>().join(", ")),
            suggested_fix: "Use system colors like var(--system-blue) or Color.blue in SwiftUI".to_string(),
            hig_reference: "Human Interface Guidelines > Color",
        });
    }

    let upper = code.to_uppercase();
    if upper.contains("#000000") || upper.contains("#FFFFFF") {
        issues.push(Issue {
            severity: Severity::Suggestion,
            category: "colors",
            description: "Pure black (#000000) or pure white (#FFFFFF) detected. Apple recommends softer alternatives.".to_string(),
            current_code: None,
            suggested_fix: "Use semantic colors like background.primary or label.primary for automatic dark mode handling".to_string(),
            hig_reference: "Human Interface Guidelines > Color > Semantic Colors",
        });
    }
    issues
}

fn analyze_typography(code: &str) -> Vec<Issue> {
    let mut issues = Vec::new();

    for (matched, size) in px_values(code, r"font-size:\s*(\d+)px") {
        if size < 11 {
            issues.push(Issue {
                severity: Severity::Critical,
                category: "typography",
                description: format!("Font size {}px is too small. Minimum readable size is 11px.", size),
                current_code: Some(matched),
                suggested_fix: "Use at least 11px for caption text, 17px for body text".to_string(),
                hig_reference: "Human Interface Guidelines > Typography",
            });
        } else if size > 11 && size < 15 {
            issues.push(Issue {
                severity: Severity::Suggestion,
                category: "typography",
                description: format!("Font size {}px is quite small. Consider 17px for body text.", size),
                current_code: Some(matched),
                suggested_fix: "Use 17px for body text, 13px for footnotes, 11-12px for captions".to_string(),
                hig_reference: "Human Interface Guidelines > Typography",
            });
        }
    }

    if let Ok(re) = Regex::new(r"font-family:\s*([^;]+)") {
        for caps in re.captures_iter(code) {
            let family = caps[1].to_lowercase();
            if family.contains("-apple-system") || family.contains("sf pro") || family.contains("system-ui") {
                continue;
            }
            issues.push(Issue {
                severity: Severity::Warning,
                category: "typography",
                description: "Non-system font detected. System fonts ensure consistency with iOS/macOS.".to_string(),
                current_code: Some(caps[0].to_string()),
                suggested_fix: format!("Use font-family: {}", tokens::SYSTEM_FONT_STACK),
                hig_reference: "Human Interface Guidelines > Typography > System Fonts",
            });
        }
    }

    let lower = code.to_lowercase();
    let light_weights = ["font-weight: 100", "font-weight: 200", "font-weight: 300", "ultralight", "thin", "light"];
    if light_weights.iter().any(|w| lower.contains(w)) {
        issues.push(Issue {
            severity: Severity::Warning,
            category: "typography",
            description: "Light font weight detected. Light weights can be hard to read.".to_string(),
            current_code: None,
            suggested_fix: "Use regular (400), medium (500), or semibold (600) for better readability".to_string(),
            hig_reference: "Human Interface Guidelines > Typography > Font Weight",
        });
    }
    issues
}

fn analyze_spacing(code: &str) -> Vec<Issue> {
    let mut issues = Vec::new();

    let mut off_grid: Vec<u32> = px_values(code, r"(?:padding|margin|gap):\s*(\d+)px")
        .into_iter()
        .map(|(_, v)| v)
        .filter(|v| *v > 0 && v % 4 != 0)
        .collect();
    off_grid.sort_unstable();
    off_grid.dedup();
    if !off_grid.is_empty() {
        let listed = off_grid.iter().map(|v| v.to_string()).collect::<Vec<_>>().join(", ");
        issues.push(Issue {
            severity: Severity::Suggestion,
            category: "spacing",
            description: format!("Found spacing values not on the 4pt/8pt grid: {}px", listed),
            current_code: None,
            suggested_fix: "Use multiples of 4 or 8 for consistent spacing (4, 8, 12, 16, 24, 32, 48, 64)".to_string(),
            hig_reference: "Human Interface Guidelines > Layout > Spacing",
        });
    }

    let small: Vec<String> = px_values(code, r"(?:min-width|min-height|width|height):\s*(\d+)px")
        .into_iter()
        .filter(|(_, v)| *v > 0 && *v < 44)
        .map(|(m, _)| m)
        .collect();
    if !small.is_empty() {
        issues.push(Issue {
            severity: Severity::Warning,
            category: "spacing",
            description: "Potential small touch targets detected. Minimum should be 44x44 points.".to_string(),
            current_code: Some(small.iter().take(3).cloned().collect::<Vec<_>>().join(", ")),
            suggested_fix: "Ensure interactive elements are at least 44x44 points".to_string(),
            hig_reference: "Human Interface Guidelines > Accessibility > Touch Targets",
        });
    }
    issues
}

fn analyze_accessibility(code: &str, code_type: &str) -> Vec<Issue> {
    let mut issues = Vec::new();

    if code_type == "react" {
        if code.contains("<button") && !code.contains("aria-label") && !code.contains("aria-labelledby") {
            issues.push(Issue {
                severity: Severity::Warning,
                category: "accessibility",
                description: "Button elements may be missing accessibility labels.".to_string(),
                current_code: None,
                suggested_fix: "Add aria-label or aria-labelledby to buttons without visible text".to_string(),
                hig_reference: "Human Interface Guidelines > Accessibility > Labels",
            });
        }
        if code.contains("<img") && !code.contains("alt=") {
            issues.push(Issue {
                severity: Severity::Critical,
                category: "accessibility",
                description: "Image elements missing alt text.".to_string(),
                current_code: None,
                suggested_fix: "Add alt=\"\" for decorative images, descriptive alt text for informative images".to_string(),
                hig_reference: "Human Interface Guidelines > Accessibility > Images",
            });
        }
    }

    if code_type == "swiftui"
        && (code.contains("Button") || code.contains("Image"))
        && !code.contains("accessibilityLabel")
    {
        issues.push(Issue {
            severity: Severity::Warning,
            category: "accessibility",
            description: "Consider adding accessibility labels for VoiceOver support.".to_string(),
            current_code: None,
            suggested_fix: "Add .accessibilityLabel(\"Description\") to interactive or informative elements".to_string(),
            hig_reference: "Human Interface Guidelines > Accessibility > VoiceOver",
        });
    }

    let animates = code.contains("animation") || code.contains("transition");
    if animates && !code.contains("prefers-reduced-motion") && !code.contains("reducedMotion") {
        issues.push(Issue {
            severity: Severity::Suggestion,
            category: "accessibility",
            description: "Animations detected without reduced motion check.".to_string(),
            current_code: None,
            suggested_fix: "Respect prefers-reduced-motion media query or UIAccessibility.isReduceMotionEnabled".to_string(),
            hig_reference: "Human Interface Guidelines > Accessibility > Motion",
        });
    }
    issues
}

fn positive_patterns(code: &str) -> Vec<&'static str> {
    let checks: [(&[&str], &str); 8] = [
        (&["-apple-system", "SF Pro", "system-ui"], "Uses Apple system fonts for native feel"),
        (&["--system-", "Color.blue", "Color.primary"], "Uses Apple system colors"),
        (&["prefers-color-scheme", "colorScheme"], "Supports dark mode"),
        (&["backdrop-filter", ".blur", "Material"], "Uses Apple-style blur/material effects"),
        (&["44px", "44pt", "minHeight: 44"], "Uses proper touch target sizing (44pt)"),
        (&["safe-area", "safeAreaInset"], "Respects safe area insets"),
        (&[".spring", "spring("], "Uses spring animations for natural feel"),
        (&["accessibilityLabel", "aria-label", "VoiceOver"], "Includes accessibility support"),
    ];
    checks
        .iter()
        .filter(|(needles, _)| needles.iter().any(|n| code.contains(n)))
        .map(|(_, positive)| *positive)
        .collect()
}

fn recommendations(args: &Args) -> Vec<&'static str> {
    let code = args.code.as_str();
    let mut out = Vec::new();

    if !code.contains("prefers-color-scheme") && !code.contains("colorScheme") && args.code_type != "swiftui" {
        out.push("Add dark mode support using @media (prefers-color-scheme: dark)");
    }
    if !code.contains("backdrop-filter") && !code.contains(".blur") && !code.contains("Material") {
        out.push("Consider using blur/material effects for depth and hierarchy");
    }
    if !code.contains("border-radius") && !code.contains("cornerRadius") && !code.contains("rounded") {
        out.push("Use rounded corners (10-16px radius) for Apple aesthetic");
    }
    if args.platform == "ios" && args.code_type == "react" {
        out.push("Consider using iOS-specific patterns like sheets, tab bars, and navigation bars");
    }
    if args.platform == "web" {
        out.push("Use -webkit-font-smoothing: antialiased for crisp text rendering");
        out.push("Consider using SF Pro font from Apple for authentic Apple feel");
    }
    if args.strict_mode {
        out.push("Audit all colors against Apple HIG color specifications");
        out.push("Verify all spacing uses the 8pt grid system");
        out.push("Ensure all interactive elements have proper feedback states");
    }
    out
}

fn render(report: &ReviewReport) -> String {
    let mut output = format!(
        "# Design Review Results\n\n## Overall Score: {}/100\n\n",
        report.score
    );

    if !report.positives.is_empty() {
        output.push_str(&format!("## Positive Patterns\n{}\n\n", bullets(&report.positives)));
    }

    if !report.issues.is_empty() {
        output.push_str(&format!("## Issues Found ({})\n\n", report.issues.len()));
        for issue in &report.issues {
            output.push_str(&format!(
                "### {} {}: {}\n",
                issue.severity.icon(),
                issue.category.to_uppercase(),
                issue.description
            ));
            if let Some(current) = &issue.current_code {
                output.push_str(&format!("**Current:** `{}`\n", current));
            }
            output.push_str(&format!("**Suggested Fix:** {}\n", issue.suggested_fix));
            output.push_str(&format!("*Reference: {}*\n\n", issue.hig_reference));
        }
    }

    if !report.recommendations.is_empty() {
        output.push_str(&format!("## Recommendations\n{}", bullets(&report.recommendations)));
    }
    output
}
