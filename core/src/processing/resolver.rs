use crate::acmi::{Acmi, AcmiObject, ObjectId};
use crate::math::geodesy::{distance, DistanceUnit};
use crate::prelude::FogConfig;
use crate::telemetry::log::LogManager;

/// A platform found by a proximity search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub id: ObjectId,
    pub distance_km: f64,
}

/// Links weapons to the platforms that launched them and the ones they hit.
///
/// Searches run inline while the recording is read: an impact late in the
/// stream is often the only evidence that an earlier platform took part.
pub struct ActivityResolver {
    hit_threshold_km: f64,
    logger: LogManager,
}

impl ActivityResolver {
    pub fn new(config: &FogConfig) -> Self {
        Self {
            hit_threshold_km: config.hit_threshold_km(),
            logger: LogManager::with_verbosity(config.verbose),
        }
    }

    pub fn hit_threshold_km(&self) -> f64 {
        self.hit_threshold_km
    }

    /// Nearest platform of the weapon's color, at any range.
    ///
    /// Country is not compared.
    pub fn find_deployer(&self, acmi: &Acmi, weapon: &AcmiObject) -> Option<Candidate> {
        self.nearest(acmi, weapon, |object, _| object.color == weapon.color, "shooter")
    }

    /// Nearest platform of any color inside the hit threshold.
    pub fn find_target(&self, acmi: &Acmi, weapon: &AcmiObject) -> Option<Candidate> {
        let threshold = self.hit_threshold_km;
        self.nearest(acmi, weapon, |_, distance_km| distance_km < threshold, "target")
    }

    /// Runs when a new weapon is registered; returns the presumed deployer.
    pub fn on_weapon_launch(&self, acmi: &mut Acmi, weapon_id: ObjectId) -> Option<ObjectId> {
        let deployer = {
            let weapon = acmi.object(weapon_id)?;
            let deployer = self.find_deployer(acmi, weapon);
            match deployer.and_then(|found| acmi.object(found.id)) {
                Some(shooter) => self.logger.narrate(format_args!(
                    "WEAPON DEPLOYED - Added new {} WEAPON with name {} fired by: {} ({})",
                    weapon.color_label(),
                    weapon.name_label(),
                    shooter.name_label(),
                    shooter.pilot_label()
                )),
                None => self.logger.narrate(format_args!(
                    "WEAPON DEPLOYED - Added new {} WEAPON with name {} fired by: UNKNOWN ({})",
                    weapon.color_label(),
                    weapon.name_label(),
                    ObjectId::UNKNOWN
                )),
            }
            deployer
        }?;

        acmi.mark_active(deployer.id);
        acmi.mark_active(weapon_id);
        Some(deployer.id)
    }

    /// Runs when a weapon is deleted; returns the platform it hit.
    pub fn on_weapon_impact(&self, acmi: &mut Acmi, weapon_id: ObjectId) -> Option<ObjectId> {
        let target = {
            let weapon = acmi.object(weapon_id)?;
            let target = self.find_target(acmi, weapon);
            match target.and_then(|found| acmi.object(found.id)) {
                Some(hit) => self.logger.narrate(format_args!(
                    "DELETE: removed {} WEAPON with name {} Target HIT: {} ({})",
                    weapon.color_label(),
                    weapon.name_label(),
                    hit.name_label(),
                    hit.pilot_label()
                )),
                None => self.logger.narrate(format_args!(
                    "DELETE: removed {} WEAPON with name {} - Did not hit any targets",
                    weapon.color_label(),
                    weapon.name_label()
                )),
            }
            target
        }?;

        acmi.mark_active(target.id);
        acmi.mark_active(weapon_id);
        Some(target.id)
    }

    fn nearest<F>(&self, acmi: &Acmi, weapon: &AcmiObject, accept: F, role: &str) -> Option<Candidate>
    where
        F: Fn(&AcmiObject, f64) -> bool,
    {
        if !weapon.position.has_fix() {
            return None;
        }

        let mut best: Option<Candidate> = None;
        for object in acmi.objects.values() {
            if object.id == weapon.id || !object.is_platform() || !object.position.has_fix() {
                continue;
            }
            let distance_km = distance(
                acmi,
                &object.position,
                &weapon.position,
                DistanceUnit::Kilometers,
            );
            if !accept(object, distance_km) {
                continue;
            }
            if best.map_or(true, |current| distance_km < current.distance_km) {
                self.logger.narrate(format_args!(
                    "Updated to new {} {} {} {} with distance of {:.3} KM",
                    role,
                    object.color_label(),
                    object.primary_type(),
                    object.name_label(),
                    distance_km
                ));
                best = Some(Candidate {
                    id: object.id,
                    distance_km,
                });
            }
        }
        best
    }
}
