use core::fmt::{self, Debug, Formatter};
use js_sys::Function;
use tracing::{error, trace};
use wasm_bindgen::{closure::Closure, JsCast};

struct Bound {
	target: web_sys::EventTarget,
	event: String,
	closure: Closure<dyn Fn(web_sys::Event)>,
}

/// Owns event listener [`Closure`]s and the targets they're attached to.
///
/// All listeners are removed from their targets when this is dropped, unless it was [`forget`](`Listeners::forget`)ten.
#[derive(Default)]
pub struct Listeners(Vec<Bound>);
impl Listeners {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds `handler` as `event` listener to `target`.
	///
	/// Returns `false` (after logging) iff the DOM refused the listener.
	pub fn listen(&mut self, target: &web_sys::EventTarget, event: &str, handler: impl 'static + Fn(web_sys::Event)) -> bool {
		let closure = Closure::wrap(Box::new(handler) as Box<dyn Fn(web_sys::Event)>);
		if let Err(error) = target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref::<Function>()) {
			error!("Failed to add event listener {:?}: {:?}", event, error);
			return false;
		}
		trace!("Created {:?} listener.", event);
		self.0.push(Bound {
			target: target.clone(),
			event: event.to_owned(),
			closure,
		});
		true
	}

	#[must_use]
	pub fn len(&self) -> usize {
		self.0.len()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Leaks all listeners, so they stay attached until the page unloads.
	pub fn forget(self) {
		trace!("Leaking {} listener(s).", self.0.len());
		core::mem::forget(self);
	}
}
impl Drop for Listeners {
	fn drop(&mut self) {
		for Bound { target, event, closure } in self.0.drain(..) {
			if let Err(error) = target.remove_event_listener_with_callback(&event, closure.as_ref().unchecked_ref::<Function>()) {
				error!("Failed to remove event listener {:?}: {:?}", event, error);
			}
			trace!("Destroyed {:?} listener.", event);
		}
	}
}
impl Debug for Listeners {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_list().entries(self.0.iter().map(|bound| &bound.event)).finish()
	}
}
