//! Human-readable formatting of sizes, lengths and durations.

const SECOND_MS: f64 = 1000.0;
const MINUTE_MS: f64 = 60.0 * SECOND_MS;
const HOUR_MS: f64 = 60.0 * MINUTE_MS;
const DAY_MS: f64 = 24.0 * HOUR_MS;

/// Decimal unit prefixes, largest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum UnitPrefix {
    Giga,
    Mega,
    Kilo,
    None,
    Milli,
    Micro,
    Nano,
    Pico,
}

impl UnitPrefix {
    pub const ALL: [UnitPrefix; 8] = [
        UnitPrefix::Giga,
        UnitPrefix::Mega,
        UnitPrefix::Kilo,
        UnitPrefix::None,
        UnitPrefix::Milli,
        UnitPrefix::Micro,
        UnitPrefix::Nano,
        UnitPrefix::Pico,
    ];

    pub fn symbol(self) -> &'static str {
        match self {
            UnitPrefix::Giga => "G",
            UnitPrefix::Mega => "M",
            UnitPrefix::Kilo => "k",
            UnitPrefix::None => "",
            UnitPrefix::Milli => "m",
            UnitPrefix::Micro => "µ",
            UnitPrefix::Nano => "n",
            UnitPrefix::Pico => "p",
        }
    }

    fn ordinal(self) -> usize {
        self as usize
    }
}

impl std::fmt::Display for UnitPrefix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Time units a duration can be displayed in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeUnit {
    Microseconds,
    Milliseconds,
    Seconds,
    Minutes,
    Hours,
    Days,
}

/// Round to `decimals` places and drop trailing zeros ("1.50" -> "1.5", "2.00" -> "2")
pub fn format_decimal(value: f64, decimals: usize) -> String {
    let text = format!("{:.*}", decimals, value);
    if !text.contains('.') {
        return text;
    }
    let trimmed = text.trim_end_matches('0').trim_end_matches('.');
    if trimmed == "-0" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Binary byte count with one decimal: 1024 -> "1.0 KB"
pub fn bytes_string(value: f64) -> String {
    let magnitude = value.abs();

    if magnitude > 549_755_813_888.0 {
        format!("{:.1} TB", round_to(value / 1_099_511_627_776.0, 1))
    } else if magnitude > 536_870_912.0 {
        format!("{:.1} GB", round_to(value / 1_073_741_824.0, 1))
    } else if magnitude > 524_288.0 {
        format!("{:.1} MB", round_to(value / 1_048_576.0, 1))
    } else if magnitude > 512.0 {
        format!("{:.1} KB", round_to(value / 1024.0, 1))
    } else {
        format!("{:.1} B", round_to(value, 1))
    }
}

/// Prefix keeping `value` within roughly 0.1 to 100 (per dimension)
pub fn best_unit(value: f64, current: UnitPrefix, dimension: i32) -> UnitPrefix {
    if value == 0.0 {
        return current;
    }

    let max_index = UnitPrefix::ALL.len() - 1;
    let factor = 1000f64.powi(dimension);
    let mid_factor = 100f64.powi(dimension);
    let mut index = current.ordinal();
    let mut v = value;

    while v.trunc() == 0.0 && index < max_index {
        v *= factor;
        index += 1;
    }
    while (v / mid_factor).trunc() != 0.0 && index > 0 {
        v /= factor;
        index -= 1;
    }

    UnitPrefix::ALL[index]
}

/// Convert `value` expressed in `from` into `to`
pub fn value_in_unit(value: f64, from: UnitPrefix, to: UnitPrefix, dimension: i32) -> f64 {
    let factor = 1000f64.powi(dimension);
    let mut index = from.ordinal();
    let mut result = value;

    while index < to.ordinal() {
        result *= factor;
        index += 1;
    }
    while index > to.ordinal() {
        result /= factor;
        index -= 1;
    }

    result
}

/// Length in meters with the best prefix: (0.01, Milli) -> "10µm"
pub fn best_unit_in_meters(value: f64, decimals: usize, current: UnitPrefix) -> String {
    let unit = best_unit(value, current, 1);
    let converted = value_in_unit(value, current, unit, 1);
    format!("{}{}m", format_decimal(converted, decimals), unit)
}

/// Coarsest unit that represents `ms` without loss
pub fn best_time_unit(ms: f64) -> TimeUnit {
    if ms % SECOND_MS != 0.0 {
        TimeUnit::Milliseconds
    } else if ms % MINUTE_MS != 0.0 {
        TimeUnit::Seconds
    } else if ms % HOUR_MS != 0.0 {
        TimeUnit::Minutes
    } else {
        TimeUnit::Hours
    }
}

/// Duration in a single unit: "2.5 h", "1.543 min", "15 ms"
pub fn display_time_in_unit(ms: f64, precision: usize, unit: TimeUnit) -> String {
    let (value, suffix) = match unit {
        TimeUnit::Days => (ms / DAY_MS, "d"),
        TimeUnit::Hours => (ms / HOUR_MS, "h"),
        TimeUnit::Minutes => (ms / MINUTE_MS, "min"),
        TimeUnit::Seconds => (ms / SECOND_MS, "sec"),
        TimeUnit::Milliseconds => (ms, "ms"),
        TimeUnit::Microseconds => (ms * 1000.0, "µs"),
    };
    format!("{} {}", format_decimal(value, precision), suffix)
}

/// Duration in the largest unit it reaches
pub fn display_time_with_comma(ms: f64, precision: usize) -> String {
    let magnitude = ms.abs();
    let unit = if magnitude >= DAY_MS {
        TimeUnit::Days
    } else if magnitude >= HOUR_MS {
        TimeUnit::Hours
    } else if magnitude >= MINUTE_MS {
        TimeUnit::Minutes
    } else if magnitude >= SECOND_MS {
        TimeUnit::Seconds
    } else if magnitude >= 1.0 || magnitude == 0.0 {
        TimeUnit::Milliseconds
    } else {
        TimeUnit::Microseconds
    };
    display_time_in_unit(ms, precision, unit)
}

/// Duration spelled out unit by unit: "2h 3min 40sec 350ms".
/// With `display_zero`, units that are zero are printed too.
pub fn display_time_with_units(ms: f64, display_zero: bool) -> String {
    let mut parts = Vec::new();
    let mut v = ms;

    let steps: [(f64, &str, &str); 4] = [
        (DAY_MS, "d", "0d"),
        (HOUR_MS, "h", "00h"),
        (MINUTE_MS, "min", "00min"),
        (SECOND_MS, "sec", "00sec"),
    ];
    for (unit_ms, suffix, zero) in steps {
        if v >= unit_ms {
            parts.push(format!("{}{}", (v / unit_ms).trunc() as i64, suffix));
            v %= unit_ms;
        } else if display_zero {
            parts.push(zero.to_string());
        }
    }

    if v != 0.0 {
        parts.push(format!("{}ms", format_decimal(v, 2)));
    } else if display_zero {
        parts.push("000ms".to_string());
    }

    parts.join(" ")
}
