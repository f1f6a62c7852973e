use std::{
    collections::BTreeMap,
    sync::atomic::{AtomicU64, AtomicUsize, Ordering},
};

use log::{debug, info};
use noise::{Fingerprint, NoiseRange, NoiseStore, NoiseVector};
use options::{OptionInput, OptionModel, OptionRegistry, OptionValue};
use parking_lot::Mutex;
use rand::Rng;
use tokio::sync::broadcast;

use crate::{ModelDescriptor, Result, SessionEvent};

/// The maximum amount of images generated in one go.
pub const MAX_COUNT: usize = 20;
const EVENTS_CAPACITY: usize = 64;

/// The identity of the active model as seen by the noise codec.
#[derive(Debug, Clone)]
pub(crate) struct ActiveModel {
    pub key: String,
    pub fingerprint: Fingerprint,
    pub range: NoiseRange,
}

/// The option and noise state of the active generation model.
///
/// Each piece of state sits behind its own lock. Whenever more than one is needed they're
/// taken in the order `model`, `options`, `noise`.
pub struct Session {
    pub(crate) model: Mutex<ActiveModel>,
    pub(crate) options: Mutex<OptionModel>,
    pub(crate) noise: Mutex<NoiseStore>,
    /// The latest noise import request handed out.
    pub(crate) imports: AtomicU64,
    count: AtomicUsize,
    events: broadcast::Sender<SessionEvent>,
}

impl Session {
    /// Creates a new `Session` for a model.
    ///
    /// # Arguments
    /// * `descriptor` - The descriptor of the active model.
    ///
    /// # Returns
    /// A new session or an error if the descriptor is invalid.
    pub fn new(descriptor: &ModelDescriptor) -> Result<Self> {
        let (active, registry) = Self::prepare(descriptor)?;
        let (events, _) = broadcast::channel(EVENTS_CAPACITY);
        let noise = NoiseStore::new(descriptor.noise_length, descriptor.default_noise.clone());

        info!(
            model = descriptor.key.as_str(),
            noise_length = descriptor.noise_length;
            "session created"
        );

        Ok(Self {
            model: Mutex::new(active),
            options: Mutex::new(OptionModel::new(registry)),
            noise: Mutex::new(noise),
            imports: AtomicU64::new(0),
            count: AtomicUsize::new(1),
            events,
        })
    }

    fn prepare(descriptor: &ModelDescriptor) -> Result<(ActiveModel, OptionRegistry)> {
        descriptor.validate()?;
        let registry = descriptor.registry()?;

        let active = ActiveModel {
            key: descriptor.key.clone(),
            fingerprint: descriptor.fingerprint(),
            range: descriptor.noise_range()?,
        };

        Ok((active, registry))
    }

    /// Switches to another generation model, every option and the noise vector start over.
    ///
    /// In-flight noise imports are invalidated. An invalid descriptor leaves the session as is.
    pub fn change_model(&self, descriptor: &ModelDescriptor) -> Result<()> {
        let (active, registry) = Self::prepare(descriptor)?;

        let mut model = self.model.lock();
        let mut options = self.options.lock();
        let mut noise = self.noise.lock();

        self.imports.fetch_add(1, Ordering::AcqRel);
        options.replace_for_model(registry);
        noise.replace_for_model(descriptor.noise_length, descriptor.default_noise.clone());
        *model = active;

        drop(noise);
        drop(options);
        drop(model);

        info!(model = descriptor.key.as_str(); "model changed");
        self.notify(SessionEvent::ModelChanged(descriptor.key.clone()));
        Ok(())
    }

    pub fn model_key(&self) -> String {
        self.model.lock().key.clone()
    }

    pub fn fingerprint(&self) -> Fingerprint {
        self.model.lock().fingerprint
    }

    pub fn noise_range(&self) -> NoiseRange {
        self.model.lock().range
    }

    /// Subscribes to the change notifications of this session.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    pub(crate) fn notify(&self, event: SessionEvent) {
        // Nobody listening is fine.
        self.events.send(event).ok();
    }

    /// See [`OptionModel::set_option`].
    pub fn set_option(
        &self,
        key: &str,
        random: bool,
        value: Option<OptionInput>,
    ) -> Result<OptionValue> {
        let value = self.options.lock().set_option(key, random, value)?.clone();
        self.notify(SessionEvent::OptionChanged(key.to_string()));
        Ok(value)
    }

    pub fn get_option(&self, key: &str) -> Result<OptionValue> {
        Ok(self.options.lock().get_option(key)?.clone())
    }

    /// Restores every option to its default.
    pub fn reset_all(&self) {
        self.options.lock().reset_all();
        self.notify(SessionEvent::OptionsReset);
    }

    /// A snapshot of every option keyed by the option's key.
    pub fn options(&self) -> BTreeMap<String, OptionValue> {
        self.options.lock().export()
    }

    pub fn noise(&self) -> NoiseVector {
        self.noise.lock().snapshot()
    }

    pub fn set_noise_random(&self, random: bool) {
        self.noise.lock().set_random(random);
        self.notify(SessionEvent::NoiseChanged);
    }

    /// Replaces the noise vector, see [`NoiseStore::set_values`].
    pub fn set_noise(&self, values: Vec<f64>, random: bool) -> Result<()> {
        self.noise.lock().set_values(values, random)?;
        self.notify(SessionEvent::NoiseChanged);
        Ok(())
    }

    /// Stores a fresh standard normal draw as the noise vector.
    pub fn randomize_noise<R: Rng>(&self, rng: &mut R) {
        self.noise.lock().randomize(rng);
        self.notify(SessionEvent::NoiseChanged);
    }

    /// Jitters the noise vector, see [`NoiseStore::perturb`].
    pub fn perturb_noise<R: Rng>(&self, rng: &mut R, range: f64) -> Result<()> {
        self.noise.lock().perturb(rng, range)?;
        self.notify(SessionEvent::NoiseChanged);
        Ok(())
    }

    /// The noise the generator should consume next.
    pub fn resolve_noise<R: Rng>(&self, rng: &mut R) -> Vec<f64> {
        self.noise.lock().resolve(rng)
    }

    /// The amount of images generated per request.
    pub fn count(&self) -> usize {
        self.count.load(Ordering::Acquire)
    }

    /// Sets the amount of images generated per request, clamped into `[1, MAX_COUNT]`.
    ///
    /// # Returns
    /// The stored count.
    pub fn set_count(&self, count: usize) -> usize {
        let count = count.clamp(1, MAX_COUNT);
        self.count.store(count, Ordering::Release);

        debug!(count = count; "generation count changed");
        self.notify(SessionEvent::CountChanged(count));
        count
    }
}
