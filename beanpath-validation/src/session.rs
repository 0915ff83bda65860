//! Validation sessions pairing facade paths with constraint checks

use crate::constraint::Constraint;
use crate::error::Result;
use crate::report::{ConstraintViolation, ViolationReporter};
use beanpath::{Facade, FacadeFactory, PathTracker, Value};
use tracing::{debug, trace};

/// One validation pass over one bean graph.
///
/// Every facade the session builds shares the session's path tracker. Read a
/// value through a facade, then hand it to [`check`](Self::check): the path
/// of that read is rendered and attached to the violation, if any.
pub struct ValidationSession<R: ViolationReporter> {
    factory: FacadeFactory,
    tracker: PathTracker,
    reporter: R,
}

impl<R: ViolationReporter> ValidationSession<R> {
    pub fn new(factory: FacadeFactory, reporter: R) -> Self {
        let tracker = factory.tracker();
        Self {
            factory,
            tracker,
            reporter,
        }
    }

    /// Build a facade over a bean instance
    pub fn wrap(&self, bean: impl Into<Value>) -> Result<Facade> {
        Ok(self.factory.over(bean, &self.tracker)?)
    }

    /// Build a store-backed facade over bare types
    pub fn wrap_types(&self, types: &[&str]) -> Result<Facade> {
        Ok(self.factory.implementing(types, &self.tracker)?)
    }

    /// Test a value read through one of this session's facades.
    ///
    /// Always consumes the pending path. Returns whether the value passed;
    /// inactive constraints always pass.
    pub fn check(&self, value: Value, constraint: &dyn Constraint) -> bool {
        let path = self.tracker.render();
        self.check_at(path, value, constraint)
    }

    /// Test every constraint against the same value.
    ///
    /// All constraints are reported under the path of the single read.
    pub fn check_all(&self, value: Value, constraints: &[&dyn Constraint]) -> bool {
        let path = self.tracker.render();
        constraints.iter().fold(true, |passed, constraint| {
            self.check_at(path.clone(), value.clone(), *constraint) && passed
        })
    }

    fn check_at(&self, path: String, value: Value, constraint: &dyn Constraint) -> bool {
        if !constraint.is_active() {
            trace!("skipping inactive constraint {} at '{}'", constraint.name(), path);
            return true;
        }
        if constraint.test(&value) {
            trace!("{} satisfied at '{}'", constraint.name(), path);
            return true;
        }

        debug!("{} violated at '{}'", constraint.name(), path);
        self.reporter.report(ConstraintViolation {
            path,
            constraint: constraint.name().to_string(),
            description: constraint.description().map(str::to_string),
            value,
        });
        false
    }

    pub fn reporter(&self) -> &R {
        &self.reporter
    }

    pub fn tracker(&self) -> &PathTracker {
        &self.tracker
    }

    pub fn factory(&self) -> &FacadeFactory {
        &self.factory
    }
}
