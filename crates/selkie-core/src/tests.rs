mod color;
mod path;
mod style;
mod units;
