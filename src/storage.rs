use codee::{CodecError, Decoder, Encoder};
use leptos::prelude::{
    signal, Effect, Get, GetUntracked, LocalStorage, ReadSignal, Set, Signal, UpdateUntracked,
    WriteSignal,
};
use leptos_use::storage::{
    use_storage_with_options, StorageType, UseStorageError, UseStorageOptions,
};
use std::fmt::Debug;

pub(crate) const SESSION_STORAGE_KEY: &str = "leptos_foundation__session";
pub(crate) const PENDING_SOCIAL_SIGN_IN_STORAGE_KEY: &str = "leptos_foundation__pending_social_sign_in";

pub(crate) struct Persisted<T>
where
    T: Send + Sync + 'static,
{
    pub(crate) read: Signal<T>,
    pub(crate) write: WriteSignal<T>,

    #[expect(unused)]
    decode_err: (ReadSignal<bool>, WriteSignal<bool>),
    #[expect(unused)]
    effect: Effect<LocalStorage>,
}

/// Persist a value in browser storage. A stored value that can no longer be decoded, e.g.
/// because `T` gained a field, is removed and replaced with `initial_value`.
pub(crate) fn use_persisted<T, C>(
    storage_type: StorageType,
    key: &'static str,
    initial_value: T,
) -> Persisted<T>
where
    T: Default + Debug + Clone + PartialEq + Send + Sync,
    C: Encoder<T, Encoded = String> + Decoder<T, Encoded = str>,
    <C as Encoder<T>>::Error: Debug,
    <C as Decoder<T>>::Error: Debug,
{
    let (decode_err, set_decode_err) = signal(false);

    let options = UseStorageOptions::default()
        .initial_value(initial_value.clone())
        .listen_to_storage_changes(true)
        .delay_during_hydration(false)
        .on_error(move |err| {
            let log_as_error = match &err {
                UseStorageError::ItemCodecError(CodecError::Decode(_)) => {
                    // Decode errors may be reported several times in quick succession.
                    // Only schedule the removal once.
                    if !decode_err.get_untracked() {
                        tracing::debug!(?err, "Data format of '{key}' changed. Scheduling removal of previously persisted value.");
                        set_decode_err.set(true);
                    }
                    false
                }
                _ => true,
            };
            if log_as_error {
                tracing::error!(?err, "Error accessing '{key}' in storage.");
            }
        });

    let (read, write, remove) = use_storage_with_options::<T, C>(storage_type, key.to_owned(), options);

    let effect = Effect::new(move |_| {
        if decode_err.get() {
            tracing::trace!(
                "Removing previously persisted value of '{key}' due to a decode error. Using initial value: {initial_value:?}"
            );
            remove();
            write.set(initial_value.clone());
            set_decode_err.update_untracked(|it| *it = false);
        }
    });

    Persisted {
        read,
        write,
        decode_err: (decode_err, set_decode_err),
        effect,
    }
}
