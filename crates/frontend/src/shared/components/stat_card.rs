use crate::shared::icons::icon;
use leptos::prelude::*;

/// How a [`StatCard`] value is printed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueFormat {
    Money,
    Integer,
}

pub fn format_value(val: f64, fmt: ValueFormat) -> String {
    match fmt {
        ValueFormat::Money => format_money(val),
        ValueFormat::Integer => format_thousands(val.round() as i64),
    }
}

/// `$ 12.345,50` style amounts
pub fn format_money(val: f64) -> String {
    let cents = (val.abs() * 100.0).round() as i64;
    let int_part = format_thousands(cents / 100);
    let sign = if val < 0.0 && cents != 0 { "-" } else { "" };
    format!("{}$ {},{:02}", sign, int_part, cents % 100)
}

fn format_thousands(n: i64) -> String {
    let s = n.abs().to_string();
    let mut result = String::new();
    for (i, ch) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push('.');
        }
        result.push(ch);
    }
    if n < 0 {
        result.push('-');
    }
    result.chars().rev().collect()
}

#[component]
pub fn StatCard(
    /// Label displayed above the value
    #[prop(into)]
    label: String,
    /// Icon name from the icon() helper
    #[prop(into)]
    icon_name: String,
    /// Primary numeric value (None = nothing to show)
    #[prop(into)]
    value: Signal<Option<f64>>,
    /// How to format the value
    format: ValueFormat,
    /// Optional subtitle below the value
    #[prop(into, optional)]
    subtitle: Signal<Option<String>>,
) -> impl IntoView {
    let formatted = move || match value.get() {
        Some(v) => format_value(v, format),
        None => "-".to_string(),
    };

    let subtitle_view = move || {
        subtitle.get().map(|s| {
            view! { <div class="stat-card__subtitle">{s}</div> }
        })
    };

    view! {
        <div class="stat-card">
            <div class="stat-card__icon">
                {icon(&icon_name)}
            </div>
            <div class="stat-card__content">
                <div class="stat-card__label">{label}</div>
                <div class="stat-card__value">{formatted}</div>
                {subtitle_view}
            </div>
        </div>
    }
}
