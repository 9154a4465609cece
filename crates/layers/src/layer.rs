use scene::MapEngineAdapter;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LayerId(pub u64);

/// Something that owns drawn state on a map surface.
pub trait Layer {
    fn id(&self) -> LayerId;

    /// Removes everything this layer drew. Called on unmount.
    fn clear(&mut self, surface: &mut dyn MapEngineAdapter);
}
