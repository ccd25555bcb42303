//! Dataset dropdown

use tracing::debug;

use crate::store::{Store, Subscription};
use crate::surface::{Intent, Menu, Region, Surface};

use super::keyed::diff;
use super::ViewContext;

pub const NO_DATASET_LABEL: &str = "Select dataset";

pub fn install<S: Surface + 'static>(store: &Store, ctx: &ViewContext<S>) -> Vec<Subscription> {
    let menu = {
        let surface = ctx.surface.clone();
        store.observe(
            "dataset_menu",
            |s| s.data.datasets.clone(),
            move |next, prev| {
                let prev = prev.map(|p| p.as_slice()).unwrap_or(&[]);
                let changes = diff(prev, next.as_slice(), |d| d.identity());
                debug!(
                    removed = changes.removed.len(),
                    added = changes.added.len(),
                    "dataset menu diff"
                );

                let mut surface = surface.borrow_mut();
                for dataset in changes.removed {
                    surface.remove_entry(Menu::Datasets, dataset.identity());
                }
                for dataset in changes.added {
                    surface.add_entry(
                        Menu::Datasets,
                        dataset.identity(),
                        &dataset.name,
                        Intent::SelectDataset {
                            identity: dataset.identity().to_string(),
                        },
                    );
                }
                Ok(())
            },
        )
    };

    let toggle = {
        let surface = ctx.surface.clone();
        store.observe(
            "dataset_toggle",
            |s| s.active_dataset().map(|d| d.name.clone()),
            move |name, _| {
                let label = name.as_deref().unwrap_or(NO_DATASET_LABEL);
                surface.borrow_mut().set_text(Region::DatasetToggle, label);
                Ok(())
            },
        )
    };

    vec![menu, toggle]
}
