// The four elemental meters: Earth, Air, Water, Fire.
//
// Spend operations are the only gate on gameplay actions (shooting, dragging
// islands, focus). They never partially apply: either the full amount is
// deducted and `true` is returned, or nothing changes.

use super::config::ResourceConfig;

#[derive(Debug, Clone)]
pub struct ResourceLedger {
    earth: f32,
    air: f32,
    water: f32,
    /// Whole fire charges (shots).
    fire: u32,

    pub max_earth: f32,
    pub max_air: f32,
    pub max_water: f32,
    pub max_fire: u32,

    pub air_depletion_rate: f32,
    pub air_regen_rate: f32,
    pub water_regen_rate: f32,
    pub earth_regen_rate: f32,
    pub fire_regen_interval: f32,

    /// Seconds spent near a fire since the last charge. Zeroed away from fire.
    fire_timer: f32,
}

impl ResourceLedger {
    pub fn new(config: &ResourceConfig) -> Self {
        Self {
            earth: config.start_earth.clamp(0.0, config.max_earth),
            air: config.max_air,
            water: 0.0,
            fire: config.start_fire.min(config.max_fire),
            max_earth: config.max_earth,
            max_air: config.max_air,
            max_water: config.max_water,
            max_fire: config.max_fire,
            air_depletion_rate: config.air_depletion_rate,
            air_regen_rate: config.air_regen_rate,
            water_regen_rate: config.water_regen_rate,
            earth_regen_rate: config.earth_regen_rate,
            fire_regen_interval: config.fire_regen_interval,
            fire_timer: 0.0,
        }
    }

    /// Advance the meters by `dt` seconds of simulated time.
    pub fn update(&mut self, dt: f32, is_moving: bool, near_water: bool, near_fire: bool) {
        let dt = dt.max(0.0);

        if is_moving {
            self.air -= self.air_depletion_rate * dt;
        } else {
            self.air += self.air_regen_rate * dt;
        }
        self.air = self.air.clamp(0.0, self.max_air);

        if near_water {
            self.water = (self.water + self.water_regen_rate * dt).min(self.max_water);
        }

        if near_fire && self.fire < self.max_fire {
            self.fire_timer += dt;
            while self.fire_timer >= self.fire_regen_interval && self.fire < self.max_fire {
                self.fire += 1;
                self.fire_timer -= self.fire_regen_interval;
            }
            if self.fire >= self.max_fire {
                self.fire_timer = 0.0;
            }
        } else if !near_fire {
            self.fire_timer = 0.0;
        }

        self.earth = (self.earth + self.earth_regen_rate * dt).min(self.max_earth);
    }

    pub fn spend_fire(&mut self) -> bool {
        if self.fire > 0 {
            self.fire -= 1;
            true
        } else {
            false
        }
    }

    pub fn spend_water(&mut self, amount: f32) -> bool {
        if self.water >= amount {
            self.water -= amount;
            true
        } else {
            false
        }
    }

    pub fn spend_earth(&mut self, amount: f32) -> bool {
        if self.earth >= amount {
            self.earth -= amount;
            true
        } else {
            false
        }
    }

    pub fn add_earth(&mut self, amount: f32) {
        self.earth = (self.earth + amount).clamp(0.0, self.max_earth);
    }

    /// Drain air for sustained flight. Saturates at zero.
    pub fn consume_air(&mut self, amount: f32) {
        self.air = (self.air - amount).clamp(0.0, self.max_air);
    }

    pub fn earth(&self) -> f32 { self.earth }
    pub fn air(&self) -> f32 { self.air }
    pub fn water(&self) -> f32 { self.water }
    pub fn fire(&self) -> u32 { self.fire }

    /// Meter fill levels in [0, 1], ordered Earth, Air, Water, Fire.
    pub fn fractions(&self) -> [f32; 4] {
        let frac = |v: f32, max: f32| if max > 0.0 { v / max } else { 0.0 };
        [
            frac(self.earth, self.max_earth),
            frac(self.air, self.max_air),
            frac(self.water, self.max_water),
            frac(self.fire as f32, self.max_fire as f32),
        ]
    }
}
