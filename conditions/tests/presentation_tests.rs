use conditions::{
    ChartOverlay, ConditionSnapshot, DrawSurface, RangePosition, TextPosition, TlineBias,
    TrendStatus, format_overlay, render,
};

fn snapshot() -> ConditionSnapshot {
    ConditionSnapshot {
        volatility_percent: 175.0,
        range_position: Some(RangePosition::Outside),
        trend_status: Some(TrendStatus::Up),
        tline_bias: Some(TlineBias::Bullish),
    }
}

#[test]
fn overlay_text_lists_all_fields() {
    let text = format_overlay("ES", &snapshot());
    assert_eq!(
        text,
        "ES\nVolatility: 175.00%\nBullish: Outside Day | Trend: Up\nConditions: ✅ Good Conditions"
    );
}

#[test]
fn volatility_is_rounded_to_two_decimals() {
    let snapshot = ConditionSnapshot {
        volatility_percent: 33.3333,
        trend_status: Some(TrendStatus::Neutral),
        ..snapshot()
    };
    let text = format_overlay("NQ", &snapshot);
    assert!(text.contains("Volatility: 33.33%"));
    assert!(text.ends_with("Conditions: ❌ Low Volatility"));
}

#[test]
fn render_replaces_previous_overlay() {
    let mut chart = ChartOverlay::new();
    chart.draw_text_fixed("Other", "keep me", TextPosition::TopLeft);

    render(&mut chart, "Status", TextPosition::BottomRight, "ES", &snapshot());
    let choppy = ConditionSnapshot {
        trend_status: Some(TrendStatus::Neutral),
        range_position: Some(RangePosition::Inside),
        ..snapshot()
    };
    let text = render(&mut chart, "Status", TextPosition::BottomRight, "ES", &choppy);

    assert_eq!(chart.len(), 2);
    assert_eq!(chart.draw_count(), 3);
    let status = chart.get("Status").expect("status overlay");
    assert_eq!(status.text, text);
    assert_eq!(status.position, TextPosition::BottomRight);
    assert!(status.text.ends_with("Conditions: ⚠️ Choppy Market"));
    assert_eq!(chart.get("Other").map(|x| x.text.as_str()), Some("keep me"));
}
