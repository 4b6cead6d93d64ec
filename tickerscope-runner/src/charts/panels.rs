//! Panel drawing for the four analysis charts.
//!
//! Panels are generic over the drawing backend so the same code draws a
//! standalone chart and one quadrant of the dashboard. The x axis is the bar
//! index. Nothing here draws text.

use super::persist::draw_err;
use super::ChartError;
use plotters::coord::Shift;
use plotters::prelude::*;
use std::ops::Range;
use tickerscope_core::domain::{DatedValue, PriceSeries};
use tickerscope_core::indicators::IndicatorSet;

use crate::metrics::RiskMetrics;

const ORANGE: RGBColor = RGBColor(255, 140, 0);
const PURPLE: RGBColor = RGBColor(128, 0, 160);
const GREY: RGBColor = RGBColor(150, 150, 150);

type Points = Vec<(f64, f64)>;

/// Everything the panels plot, projected onto bar-index coordinates.
pub(crate) struct ChartData {
    bars: usize,
    price: Points,
    ma50: Points,
    ma200: Points,
    rolling_volatility: Points,
    volatility: Option<f64>,
    drawdown_pct: Points,
    rolling_sharpe: Points,
    sharpe_ratio: Option<f64>,
}

impl ChartData {
    pub(crate) fn new(series: &PriceSeries, indicators: &IndicatorSet, risk: &RiskMetrics) -> Self {
        let project = |values: &[DatedValue], scale: f64| -> Points {
            values
                .iter()
                .filter_map(|v| series.index_of(v.date).map(|i| (i as f64, v.value * scale)))
                .collect()
        };

        Self {
            bars: series.len(),
            price: series
                .closes()
                .into_iter()
                .enumerate()
                .map(|(i, c)| (i as f64, c))
                .collect(),
            ma50: project(&indicators.ma50, 1.0),
            ma200: project(&indicators.ma200, 1.0),
            rolling_volatility: project(&indicators.rolling_volatility, 1.0),
            volatility: indicators.volatility,
            drawdown_pct: project(&risk.drawdown_series, 100.0),
            rolling_sharpe: project(&risk.rolling_sharpe, 1.0),
            sharpe_ratio: risk.sharpe_ratio,
        }
    }

    fn x_range(&self) -> Range<f64> {
        0.0..(self.bars.max(2) - 1) as f64
    }

    fn horizontal(&self, y: f64) -> Points {
        let x = self.x_range();
        vec![(x.start, y), (x.end, y)]
    }
}

/// Y range covering every point and extra levels, padded by 5%.
fn y_range<'a>(series: impl IntoIterator<Item = &'a Points>, extra: &[f64]) -> Range<f64> {
    let ys = series
        .into_iter()
        .flat_map(|p| p.iter().map(|(_, y)| *y))
        .chain(extra.iter().copied())
        .filter(|y| y.is_finite());

    let (lo, hi) = ys.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), y| {
        (lo.min(y), hi.max(y))
    });
    if !lo.is_finite() || !hi.is_finite() {
        return -1.0..1.0;
    }
    let span = hi - lo;
    let pad = if span > 0.0 { span * 0.05 } else { lo.abs().max(1.0) * 0.05 };
    (lo - pad)..(hi + pad)
}

/// Price with the 50- and 200-day moving averages.
pub(crate) fn draw_price<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    data: &ChartData,
) -> Result<(), ChartError> {
    let y = y_range([&data.price, &data.ma50, &data.ma200], &[]);
    let mut chart = ChartBuilder::on(area)
        .margin(12)
        .build_cartesian_2d(data.x_range(), y)
        .map_err(draw_err)?;

    chart
        .draw_series(LineSeries::new(data.price.iter().copied(), BLUE.stroke_width(2)))
        .map_err(draw_err)?;
    chart
        .draw_series(LineSeries::new(data.ma50.iter().copied(), &ORANGE))
        .map_err(draw_err)?;
    chart
        .draw_series(LineSeries::new(data.ma200.iter().copied(), &RED))
        .map_err(draw_err)?;
    Ok(())
}

/// Rolling 30-day volatility with the whole-series level.
pub(crate) fn draw_volatility<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    data: &ChartData,
) -> Result<(), ChartError> {
    let mut levels = vec![0.0];
    levels.extend(data.volatility);
    let y = y_range([&data.rolling_volatility], &levels);
    let mut chart = ChartBuilder::on(area)
        .margin(12)
        .build_cartesian_2d(data.x_range(), y)
        .map_err(draw_err)?;

    chart
        .draw_series(LineSeries::new(
            data.rolling_volatility.iter().copied(),
            PURPLE.stroke_width(2),
        ))
        .map_err(draw_err)?;
    if let Some(vol) = data.volatility {
        chart
            .draw_series(LineSeries::new(data.horizontal(vol), &RED))
            .map_err(draw_err)?;
    }
    Ok(())
}

/// Drawdown in percent as a filled area under zero.
pub(crate) fn draw_drawdown<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    data: &ChartData,
) -> Result<(), ChartError> {
    let y = y_range([&data.drawdown_pct], &[0.0]);
    let mut chart = ChartBuilder::on(area)
        .margin(12)
        .build_cartesian_2d(data.x_range(), y)
        .map_err(draw_err)?;

    chart
        .draw_series(
            AreaSeries::new(data.drawdown_pct.iter().copied(), 0.0, RED.mix(0.3))
                .border_style(&RED),
        )
        .map_err(draw_err)?;
    chart
        .draw_series(LineSeries::new(data.horizontal(0.0), &BLACK))
        .map_err(draw_err)?;
    Ok(())
}

/// Rolling Sharpe with the whole-series Sharpe and zero lines.
pub(crate) fn draw_sharpe<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    data: &ChartData,
) -> Result<(), ChartError> {
    let mut levels = vec![0.0];
    levels.extend(data.sharpe_ratio);
    let y = y_range([&data.rolling_sharpe], &levels);
    let mut chart = ChartBuilder::on(area)
        .margin(12)
        .build_cartesian_2d(data.x_range(), y)
        .map_err(draw_err)?;

    chart
        .draw_series(LineSeries::new(
            data.rolling_sharpe.iter().copied(),
            GREEN.stroke_width(2),
        ))
        .map_err(draw_err)?;
    chart
        .draw_series(LineSeries::new(data.horizontal(0.0), &GREY))
        .map_err(draw_err)?;
    if let Some(sharpe) = data.sharpe_ratio {
        chart
            .draw_series(LineSeries::new(data.horizontal(sharpe), &RED))
            .map_err(draw_err)?;
    }
    Ok(())
}

/// 2x2 grid: price, volatility / drawdown, Sharpe.
pub(crate) fn draw_dashboard<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    data: &ChartData,
) -> Result<(), ChartError> {
    let panels = area.split_evenly((2, 2));
    draw_price(&panels[0], data)?;
    draw_volatility(&panels[1], data)?;
    draw_drawdown(&panels[2], data)?;
    draw_sharpe(&panels[3], data)?;
    Ok(())
}
