//! Weather controller: cycles global weather on a fixed schedule.
//!
//! Modifiers are pure functions of the weather type; the controller only
//! blends between the previous and current weather over the transition
//! window at the start of each state.

use siege_core::constants::*;
use siege_core::enums::WeatherType;
use siege_core::events::SimEvent;

use crate::feed::AlertSlot;
use crate::systems::EPSILON;

/// Physics and visibility modifiers for one weather type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeatherModifiers {
    pub friction_mult: f64,
    pub heat_dissipation_mult: f64,
    pub visibility: f64,
    /// Radar position jitter amplitude (px).
    pub radar_jitter: f64,
}

/// Modifiers for a weather type.
pub fn modifiers(weather: WeatherType) -> WeatherModifiers {
    let clear = WeatherModifiers {
        friction_mult: 1.0,
        heat_dissipation_mult: 1.0,
        visibility: 1.0,
        radar_jitter: 0.0,
    };
    match weather {
        WeatherType::Clear => clear,
        WeatherType::IonStorm => WeatherModifiers {
            visibility: ION_STORM_VISIBILITY,
            radar_jitter: ION_STORM_RADAR_JITTER,
            ..clear
        },
        WeatherType::Thunderstorm => WeatherModifiers {
            visibility: THUNDERSTORM_VISIBILITY,
            ..clear
        },
        WeatherType::Freeze => WeatherModifiers {
            friction_mult: FREEZE_WEATHER_FRICTION_MULT,
            heat_dissipation_mult: FREEZE_WEATHER_HEAT_MULT,
            ..clear
        },
    }
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Global weather state.
#[derive(Debug, Clone)]
pub struct WeatherState {
    pub current: WeatherType,
    pub previous: WeatherType,
    /// Seconds spent in the current weather.
    pub elapsed: f64,
}

impl Default for WeatherState {
    fn default() -> Self {
        Self {
            current: WeatherType::Clear,
            previous: WeatherType::Clear,
            elapsed: 0.0,
        }
    }
}

impl WeatherState {
    /// Blend factor from the previous weather (0) to the current one (1).
    pub fn blend(&self) -> f64 {
        (self.elapsed / WEATHER_TRANSITION).clamp(0.0, 1.0)
    }

    /// Modifiers blended over the transition window.
    pub fn modifiers(&self) -> WeatherModifiers {
        let from = modifiers(self.previous);
        let to = modifiers(self.current);
        let t = self.blend();
        if t >= 1.0 {
            return to;
        }
        WeatherModifiers {
            friction_mult: lerp(from.friction_mult, to.friction_mult, t),
            heat_dissipation_mult: lerp(from.heat_dissipation_mult, to.heat_dissipation_mult, t),
            visibility: lerp(from.visibility, to.visibility, t),
            radar_jitter: lerp(from.radar_jitter, to.radar_jitter, t),
        }
    }

    pub fn time_to_change(&self) -> f64 {
        (WEATHER_DURATION - self.elapsed).max(0.0)
    }

    /// Advance the weather clock. Returns the new weather on a change.
    pub fn advance(&mut self, dt: f64) -> Option<WeatherType> {
        self.elapsed += dt;
        if self.elapsed + EPSILON < WEATHER_DURATION {
            return None;
        }
        self.elapsed = (self.elapsed - WEATHER_DURATION).max(0.0);
        self.previous = self.current;
        self.current = self.current.next();
        Some(self.current)
    }
}

/// Run the weather controller for one tick.
pub fn run(weather: &mut WeatherState, alert: &mut AlertSlot, events: &mut Vec<SimEvent>, now: f64) {
    if let Some(next) = weather.advance(DT) {
        tracing::info!(weather = next.name(), "weather changed");
        alert.raise(
            &format!("WEATHER: {}", next.name()),
            weather_subtext(next),
            "#88ccff",
            now,
        );
        events.push(SimEvent::WeatherChanged { weather: next });
    }
}

fn weather_subtext(weather: WeatherType) -> &'static str {
    match weather {
        WeatherType::Clear => "Conditions nominal",
        WeatherType::IonStorm => "Radar interference detected",
        WeatherType::Thunderstorm => "Reduced traction and visibility",
        WeatherType::Freeze => "Ice plates forming, heat sinks degraded",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weather_holds_then_cycles() {
        let mut w = WeatherState::default();
        let ticks = (WEATHER_DURATION / DT).round() as usize;
        for _ in 0..ticks - 1 {
            assert_eq!(w.advance(DT), None);
        }
        assert_eq!(w.advance(DT), Some(WeatherType::IonStorm));
        assert_eq!(w.previous, WeatherType::Clear);
    }

    #[test]
    fn test_modifiers_blend_over_transition() {
        let mut w = WeatherState {
            current: WeatherType::Freeze,
            previous: WeatherType::Thunderstorm,
            elapsed: 0.0,
        };
        assert_eq!(w.modifiers().friction_mult, 1.0, "start of blend uses previous weather");
        w.elapsed = WEATHER_TRANSITION / 2.0;
        let mid = w.modifiers().friction_mult;
        assert!(mid > 1.0 && mid < FREEZE_WEATHER_FRICTION_MULT);
        w.elapsed = WEATHER_TRANSITION;
        assert_eq!(w.modifiers(), modifiers(WeatherType::Freeze));
    }

    #[test]
    fn test_freeze_reduces_heat_dissipation() {
        assert!(
            modifiers(WeatherType::Freeze).heat_dissipation_mult
                < modifiers(WeatherType::Clear).heat_dissipation_mult
        );
    }

    #[test]
    fn test_only_ion_storm_jitters_radar() {
        for w in [WeatherType::Clear, WeatherType::Thunderstorm, WeatherType::Freeze] {
            assert_eq!(modifiers(w).radar_jitter, 0.0);
        }
        assert!(modifiers(WeatherType::IonStorm).radar_jitter > 0.0);
    }
}
