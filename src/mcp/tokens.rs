//! Apple design tokens served by the resource catalog and consulted by the tools.

use serde_json::{json, Value};

/// System colors as (name, light, dark)
pub const SYSTEM_COLORS: &[(&str, &str, &str)] = &[
    ("blue", "#007AFF", "#0A84FF"),
    ("green", "#34C759", "#30D158"),
    ("indigo", "#5856D6", "#5E5CE6"),
    ("orange", "#FF9500", "#FF9F0A"),
    ("pink", "#FF2D55", "#FF375F"),
    ("purple", "#AF52DE", "#BF5AF2"),
    ("red", "#FF3B30", "#FF453A"),
    ("teal", "#5AC8FA", "#64D2FF"),
    ("yellow", "#FFCC00", "#FFD60A"),
    ("gray", "#8E8E93", "#8E8E93"),
    ("gray2", "#AEAEB2", "#636366"),
    ("gray3", "#C7C7CC", "#48484A"),
    ("gray4", "#D1D1D6", "#3A3A3C"),
    ("gray5", "#E5E5EA", "#2C2C2E"),
    ("gray6", "#F2F2F7", "#1C1C1E"),
];

pub const SYSTEM_FONT_STACK: &str = "-apple-system, BlinkMacSystemFont, \"SF Pro Display\", \"SF Pro Text\", \"Helvetica Neue\", system-ui, sans-serif";

pub fn is_system_color(hex: &str) -> bool {
    SYSTEM_COLORS
        .iter()
        .any(|(_, light, dark)| light.eq_ignore_ascii_case(hex) || dark.eq_ignore_ascii_case(hex))
}

pub fn system_color(name: &str) -> Option<(&'static str, &'static str)> {
    SYSTEM_COLORS
        .iter()
        .find(|(n, _, _)| *n == name)
        .map(|(_, light, dark)| (*light, *dark))
}

fn system_colors() -> Value {
    let map = SYSTEM_COLORS
        .iter()
        .map(|(name, light, dark)| (name.to_string(), json!({ "light": light, "dark": dark })))
        .collect::<serde_json::Map<_, _>>();
    Value::Object(map)
}

fn semantic_colors() -> Value {
    json!({
        "background": {
            "primary": { "light": "#FFFFFF", "dark": "#000000" },
            "secondary": { "light": "#F2F2F7", "dark": "#1C1C1E" },
            "tertiary": { "light": "#FFFFFF", "dark": "#2C2C2E" },
            "grouped": { "light": "#F2F2F7", "dark": "#000000" }
        },
        "label": {
            "primary": { "light": "#000000", "dark": "#FFFFFF" },
            "secondary": { "light": "rgba(60, 60, 67, 0.6)", "dark": "rgba(235, 235, 245, 0.6)" },
            "tertiary": { "light": "rgba(60, 60, 67, 0.3)", "dark": "rgba(235, 235, 245, 0.3)" }
        },
        "fill": {
            "primary": { "light": "rgba(120, 120, 128, 0.2)", "dark": "rgba(120, 120, 128, 0.36)" },
            "secondary": { "light": "rgba(120, 120, 128, 0.16)", "dark": "rgba(120, 120, 128, 0.32)" }
        },
        "separator": {
            "opaque": { "light": "#C6C6C8", "dark": "#38383A" },
            "nonOpaque": { "light": "rgba(60, 60, 67, 0.36)", "dark": "rgba(84, 84, 88, 0.65)" }
        },
        "link": { "light": "#007AFF", "dark": "#0A84FF" }
    })
}

fn gradients() -> Value {
    json!({
        "vibrantBlue": ["#007AFF", "#00C6FF"],
        "sunset": ["#FF9500", "#FF2D55"],
        "purple": ["#5856D6", "#AF52DE"],
        "green": ["#34C759", "#30D158"]
    })
}

/// Color tokens by category: `system`, `semantic`, `gradients` or `all`
pub fn colors(category: &str) -> Option<Value> {
    match category {
        "system" => Some(system_colors()),
        "semantic" => Some(semantic_colors()),
        "gradients" => Some(gradients()),
        "all" => Some(json!({
            "system": system_colors(),
            "semantic": semantic_colors(),
            "gradients": gradients(),
            "accessible": {
                "minimumContrast": 4.5,
                "largeTextContrast": 3.0
            }
        })),
        _ => None,
    }
}

fn font_families() -> Value {
    json!({
        "system": SYSTEM_FONT_STACK,
        "mono": "\"SF Mono\", ui-monospace, Menlo, Monaco, monospace",
        "rounded": "\"SF Pro Rounded\", -apple-system, BlinkMacSystemFont, system-ui, sans-serif"
    })
}

fn font_weights() -> Value {
    json!({
        "ultralight": 100, "thin": 200, "light": 300, "regular": 400,
        "medium": 500, "semibold": 600, "bold": 700, "heavy": 800, "black": 900
    })
}

// (style, size, weight, lineHeight)
const IOS_SCALE: &[(&str, u32, u32, u32)] = &[
    ("largeTitle", 34, 700, 41),
    ("title1", 28, 700, 34),
    ("title2", 22, 700, 28),
    ("title3", 20, 600, 25),
    ("headline", 17, 600, 22),
    ("body", 17, 400, 22),
    ("callout", 16, 400, 21),
    ("subheadline", 15, 400, 20),
    ("footnote", 13, 400, 18),
    ("caption1", 12, 400, 16),
    ("caption2", 11, 400, 13),
];

const MACOS_SCALE: &[(&str, u32, u32, u32)] = &[
    ("largeTitle", 26, 700, 32),
    ("title1", 22, 700, 26),
    ("title2", 17, 700, 22),
    ("title3", 15, 600, 20),
    ("headline", 13, 700, 16),
    ("body", 13, 400, 16),
    ("callout", 12, 400, 15),
    ("subheadline", 11, 400, 14),
    ("footnote", 10, 400, 13),
    ("caption1", 10, 500, 13),
    ("caption2", 10, 400, 13),
];

fn type_scale(scale: &[(&str, u32, u32, u32)]) -> Value {
    let map = scale
        .iter()
        .map(|(style, size, weight, line_height)| {
            (
                style.to_string(),
                json!({ "size": size, "weight": weight, "lineHeight": line_height }),
            )
        })
        .collect::<serde_json::Map<_, _>>();
    Value::Object(map)
}

fn web_scale() -> Value {
    // web reuses the iOS point sizes as pixels with unitless line heights
    let map = IOS_SCALE
        .iter()
        .map(|(style, size, weight, line_height)| {
            let ratio = (*line_height as f64 / *size as f64 * 100.0).round() / 100.0;
            (
                style.to_string(),
                json!({ "size": format!("{}px", size), "weight": weight, "lineHeight": ratio }),
            )
        })
        .collect::<serde_json::Map<_, _>>();
    Value::Object(map)
}

/// Typography tokens by platform: `ios`, `macos`, `web` or `all`
pub fn typography(platform: &str) -> Option<Value> {
    let scale = match platform {
        "ios" => type_scale(IOS_SCALE),
        "macos" => type_scale(MACOS_SCALE),
        "web" => web_scale(),
        "all" => {
            return Some(json!({
                "fontFamily": font_families(),
                "ios": type_scale(IOS_SCALE),
                "macos": type_scale(MACOS_SCALE),
                "web": web_scale(),
                "weights": font_weights(),
                "accessibility": {
                    "minimumBodySize": 17,
                    "minimumButtonSize": 15
                }
            }))
        }
        _ => return None,
    };

    Some(json!({
        "fontFamily": font_families(),
        "scale": scale,
        "weights": font_weights()
    }))
}

pub fn spacing_scale() -> Value {
    json!({ "xxs": 2, "xs": 4, "sm": 8, "md": 16, "lg": 24, "xl": 32, "xxl": 48, "xxxl": 64 })
}

pub fn spacing_components() -> Value {
    json!({
        "listItem": { "paddingVertical": 11, "paddingHorizontal": 16, "minHeight": 44 },
        "card": { "padding": 16, "borderRadius": 12 },
        "button": { "paddingVertical": 12, "paddingHorizontal": 20, "minHeight": 44, "borderRadius": 12 },
        "input": { "paddingVertical": 12, "paddingHorizontal": 16, "minHeight": 44, "borderRadius": 10 },
        "navigationBar": { "height": 44, "largeTitleHeight": 96 },
        "tabBar": { "height": 49, "heightWithLabels": 83 }
    })
}

pub fn spacing() -> Value {
    json!({
        "baseUnit": 8,
        "scale": spacing_scale(),
        "layout": {
            "screenMargin": { "compact": 16, "regular": 20 },
            "safeArea": { "top": 44, "bottom": 34 },
            "sectionSpacing": 32
        },
        "components": spacing_components(),
        "touchTargets": { "minimum": 44, "recommended": 48, "comfortable": 56 }
    })
}

pub fn animation_springs() -> Value {
    json!({
        "snappy": { "response": 0.3, "dampingFraction": 0.825, "description": "Quick, responsive feel for button presses" },
        "default": { "response": 0.55, "dampingFraction": 0.825, "description": "Standard spring for most UI animations" },
        "bouncy": { "response": 0.5, "dampingFraction": 0.7, "description": "Playful bounce for fun interactions" },
        "smooth": { "response": 0.5, "dampingFraction": 1.0, "description": "Smooth without bounce" }
    })
}

pub fn animation_curves() -> Value {
    json!({
        "linear": "cubic-bezier(0, 0, 1, 1)",
        "easeInOut": "cubic-bezier(0.42, 0, 0.58, 1.0)",
        "appleEase": "cubic-bezier(0.25, 0.1, 0.25, 1.0)",
        "springLike": "cubic-bezier(0.34, 1.56, 0.64, 1)"
    })
}

pub fn animation_patterns() -> Value {
    json!({
        "viewTransition": { "duration": 0.35, "curve": "easeInOut", "description": "Standard view push/pop transition" },
        "modalPresent": { "duration": 0.5, "spring": "default", "description": "Sheet or modal presentation" },
        "buttonPress": { "duration": 0.1, "scale": 0.97, "description": "Pressed-state feedback" }
    })
}

pub fn animations() -> Value {
    json!({
        "timing": {
            "fast": { "duration": 0.2, "curve": "ease-out" },
            "default": { "duration": 0.35, "curve": "ease-in-out" },
            "slow": { "duration": 0.5, "curve": "ease-in-out" }
        },
        "springs": animation_springs(),
        "bezierCurves": animation_curves(),
        "patterns": animation_patterns(),
        "reducedMotion": {
            "strategy": "Replace motion with cross-fades when the user prefers reduced motion"
        }
    })
}

pub fn shadows_css() -> Value {
    json!({
        "light": {
            "level0": "none",
            "level1": "0 1px 3px rgba(0, 0, 0, 0.12)",
            "level2": "0 2px 8px rgba(0, 0, 0, 0.15)",
            "level3": "0 4px 16px rgba(0, 0, 0, 0.18)",
            "level4": "0 8px 32px rgba(0, 0, 0, 0.22)"
        },
        "dark": {
            "level0": "none",
            "level1": "0 1px 3px rgba(0, 0, 0, 0.3)",
            "level2": "0 2px 8px rgba(0, 0, 0, 0.4)",
            "level3": "0 4px 16px rgba(0, 0, 0, 0.5)",
            "level4": "0 8px 32px rgba(0, 0, 0, 0.6)"
        }
    })
}

/// CSS box-shadow for an elevation level, clamped to 0..=4
pub fn shadow_level_css(level: u8) -> &'static str {
    match level {
        0 => "none",
        1 => "0 1px 3px rgba(0, 0, 0, 0.12)",
        2 => "0 2px 8px rgba(0, 0, 0, 0.15)",
        3 => "0 4px 16px rgba(0, 0, 0, 0.18)",
        _ => "0 8px 32px rgba(0, 0, 0, 0.22)",
    }
}

pub fn shadows() -> Value {
    json!({
        "levels": {
            "0": { "offset": { "x": 0, "y": 0 }, "blur": 0, "opacity": 0, "description": "No elevation" },
            "1": { "offset": { "x": 0, "y": 1 }, "blur": 3, "opacity": 0.12, "description": "Subtle elevation for cards and list items" },
            "2": { "offset": { "x": 0, "y": 2 }, "blur": 8, "opacity": 0.15, "description": "Medium elevation for dropdowns and popovers" },
            "3": { "offset": { "x": 0, "y": 4 }, "blur": 16, "opacity": 0.18, "description": "High elevation for modals and sheets" },
            "4": { "offset": { "x": 0, "y": 8 }, "blur": 32, "opacity": 0.22, "description": "Maximum elevation for focused dialogs" }
        },
        "css": shadows_css()
    })
}

const MATERIALS: &[(&str, u32, f64, f64)] = &[
    ("ultraThin", 10, 0.7, 0.65),
    ("thin", 20, 0.75, 0.7),
    ("regular", 30, 0.8, 0.75),
    ("thick", 40, 0.85, 0.8),
    ("chrome", 50, 0.9, 0.85),
];

pub fn materials_css() -> Value {
    let mut light = serde_json::Map::new();
    let mut dark = serde_json::Map::new();
    for (name, blur, light_opacity, dark_opacity) in MATERIALS {
        light.insert(
            name.to_string(),
            json!(format!(
                "backdrop-filter: blur({}px) saturate(180%); background-color: rgba(255, 255, 255, {});",
                blur, light_opacity
            )),
        );
        dark.insert(
            name.to_string(),
            json!(format!(
                "backdrop-filter: blur({}px) saturate(180%); background-color: rgba(28, 28, 30, {});",
                blur, dark_opacity
            )),
        );
    }
    json!({ "light": light, "dark": dark })
}

pub fn materials() -> Value {
    let levels = MATERIALS
        .iter()
        .map(|(name, blur, light_opacity, dark_opacity)| {
            (
                name.to_string(),
                json!({
                    "blur": blur,
                    "saturation": 1.8,
                    "opacity": { "light": light_opacity, "dark": dark_opacity },
                    "swiftui": format!(".{}Material", name)
                }),
            )
        })
        .collect::<serde_json::Map<_, _>>();
    json!({ "materials": levels, "css": materials_css() })
}
