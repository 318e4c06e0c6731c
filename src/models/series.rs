use chrono::NaiveDate;
use serde::Serialize;

/// One day of observed market signals.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct SeriesPoint {
    pub date: NaiveDate,
    pub demand: f64,
    pub supply: f64,
    pub price: f64,
    pub weather: f64,
}

/// A contiguous daily history, oldest first, ending "now". Owned by the
/// invocation that generated it and never shared across requests.
#[derive(Debug, Clone)]
pub struct MarketSeries {
    points: Vec<SeriesPoint>,
}

impl MarketSeries {
    pub fn new(points: Vec<SeriesPoint>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[SeriesPoint] {
        &self.points
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.points.last().map(|p| p.date)
    }

    pub fn demand(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.demand).collect()
    }

    pub fn supply(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.supply).collect()
    }

    pub fn price(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.price).collect()
    }

    pub fn weather(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.weather).collect()
    }
}

/// Forecastable market signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    Demand,
    Supply,
    Price,
}

impl Signal {
    pub fn name(self) -> &'static str {
        match self {
            Signal::Demand => "demand",
            Signal::Supply => "supply",
            Signal::Price => "price",
        }
    }

    pub fn values(self, series: &MarketSeries) -> Vec<f64> {
        match self {
            Signal::Demand => series.demand(),
            Signal::Supply => series.supply(),
            Signal::Price => series.price(),
        }
    }
}
