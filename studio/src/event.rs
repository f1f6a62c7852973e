/// Change notifications delivered to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    OptionChanged(String),
    OptionsReset,
    NoiseChanged,
    CountChanged(usize),
    ModelChanged(String),
}
