use crate::{Component, ComponentId};

/// A factory for one component type: `ComponentLibrary::add` pairs one of
/// these with an id, `ComponentLibrary::create` invokes it to build a fresh
/// boxed instance for `addNode`/`CreateComponent`.
pub type ComponentFactory = fn() -> Box<dyn Component>;

/// Process-wide registry mapping [`ComponentId`] to a factory function.
///
/// Mirrors the original design's global component table: generated
/// component tables and any host-defined extensions register themselves
/// here with [`ComponentLibrary::add`], and the host protocol's
/// `CreateComponent` command resolves against it via
/// [`ComponentLibrary::create`].
#[derive(Default)]
pub struct ComponentLibrary {
    factories: Vec<(ComponentId, ComponentFactory)>,
}

impl ComponentLibrary {
    pub fn new() -> Self {
        Self { factories: Vec::new() }
    }

    /// Register `factory` under `id`. Registering the same id twice replaces
    /// the earlier factory.
    pub fn add(&mut self, id: ComponentId, factory: ComponentFactory) {
        if let Some(existing) = self.factories.iter_mut().find(|(i, _)| *i == id) {
            existing.1 = factory;
        } else {
            self.factories.push((id, factory));
        }
    }

    /// Build a fresh instance of the component registered under `id`.
    pub fn create(&self, id: ComponentId) -> Option<Box<dyn Component>> {
        self.factories
            .iter()
            .find(|(i, _)| *i == id)
            .map(|(_, factory)| factory())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Noop;

    impl Component for Noop {
        fn n_ports(&self) -> usize {
            1
        }

        fn component_id(&self) -> ComponentId {
            ComponentId(9)
        }

        fn process(&mut self, _ctx: &mut crate::ProcessContext, _packet: crate::Packet, _port: crate::PortId) {}
    }

    #[test]
    fn create_invokes_the_registered_factory() {
        let mut lib = ComponentLibrary::new();
        lib.add(ComponentId(9), || Box::new(Noop));

        let instance = lib.create(ComponentId(9)).expect("registered");
        assert_eq!(instance.component_id(), ComponentId(9));
        assert!(lib.create(ComponentId(200)).is_none());
    }
}
