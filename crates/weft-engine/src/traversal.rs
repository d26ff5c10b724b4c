//! Iterative depth-first traversal over fiber work nodes.
//!
//! [`Traversal`] decomposes a recursive tree render into explicit units of
//! work. Each [`perform_unit_of_work`](Traversal::perform_unit_of_work) call
//! materializes one fiber's output node, attaches it to its parent, links
//! the fiber's children, and returns the next unit, so a driver can stop
//! between any two units and resume later.

use log::trace;

use crate::element::Element;
use crate::error::EngineError;
use crate::fiber::{Fiber, FiberId};
use crate::host::OutputTree;

/// A single in-progress depth-first pass over one element tree.
pub struct Traversal<O: OutputTree> {
    fibers: Vec<Fiber<O::Handle>>,
}

impl<O: OutputTree> Traversal<O> {
    /// Seed a traversal: a synthetic root fiber whose single child
    /// descriptor is `root` and whose output node is already the host
    /// `container`.
    ///
    /// Nothing else is constructed; the returned id is the first unit of
    /// work.
    pub fn begin(root: Element, container: O::Handle) -> (Self, FiberId) {
        let mut host_fiber = Fiber::new(Element::new("#container").child(root), None);
        host_fiber.output = Some(container);
        (
            Traversal {
                fibers: vec![host_fiber],
            },
            FiberId(0),
        )
    }

    /// Number of fibers created so far, synthetic root included.
    pub fn fiber_count(&self) -> usize {
        self.fibers.len()
    }

    /// Read-only view of a fiber.
    pub fn fiber(&self, id: FiberId) -> Option<&Fiber<O::Handle>> {
        self.fibers.get(id.0 as usize)
    }

    /// Perform one unit of work and return the next one.
    ///
    /// In order: construct this fiber's output node if it has none
    /// (validating the element kind first), attach it to the parent's
    /// output node, create and link one fiber per child descriptor, then
    /// descend to the first child or walk up to the nearest ancestor
    /// sibling. `None` means the traversal is complete.
    ///
    /// The visited flag is set only after the fallible part of the unit has
    /// completed, so a failed unit can be retried without re-attaching
    /// anything.
    pub fn perform_unit_of_work(
        &mut self,
        output: &mut O,
        id: FiberId,
    ) -> Result<Option<FiberId>, EngineError> {
        let idx = id.0 as usize;
        if idx >= self.fibers.len() {
            return Err(EngineError::UnknownFiber(id));
        }
        if self.fibers[idx].visited {
            return Err(EngineError::FiberAlreadyVisited(id));
        }
        if !self.fibers[idx].element.kind().is_well_formed() {
            return Err(EngineError::MissingKind);
        }

        // Construct the output node on first visit. The synthetic root
        // already carries the host container.
        let handle = match self.fibers[idx].output.clone() {
            Some(handle) => handle,
            None => {
                let handle = output.construct_node(
                    self.fibers[idx].element.kind(),
                    self.fibers[idx].element.attributes(),
                )?;
                self.fibers[idx].output = Some(handle.clone());
                handle
            }
        };

        // Attach to the parent's output node, exactly once per fiber.
        if let Some(parent_id) = self.fibers[idx].parent {
            let parent_handle = self.fibers[parent_id.0 as usize]
                .output
                .clone()
                .ok_or(EngineError::ParentNotMaterialized(id))?;
            output.attach_child(&parent_handle, &handle);
        }

        // The fallible work is done; from here the unit always completes.
        self.fibers[idx].visited = true;

        // One fiber per child descriptor, linked first-child/next-sibling.
        let children = self.fibers[idx].element.take_children();
        let mut previous: Option<FiberId> = None;
        for child_element in children {
            let child_id = FiberId(self.fibers.len() as u32);
            self.fibers.push(Fiber::new(child_element, Some(id)));
            match previous {
                None => self.fibers[idx].child = Some(child_id),
                Some(prev) => self.fibers[prev.0 as usize].sibling = Some(child_id),
            }
            previous = Some(child_id);
        }

        trace!("performed unit {id}, {} fiber(s) total", self.fibers.len());

        // Descend first.
        if let Some(child) = self.fibers[idx].child {
            return Ok(Some(child));
        }

        // Otherwise the nearest ancestor sibling; `None` ends the pass.
        let mut cursor = id;
        loop {
            if let Some(sibling) = self.fibers[cursor.0 as usize].sibling {
                return Ok(Some(sibling));
            }
            match self.fibers[cursor.0 as usize].parent {
                Some(parent) => cursor = parent,
                None => return Ok(None),
            }
        }
    }
}
