use kernel::KernelError;

/// Converts a backend specific error into a [`KernelError`] report, keeping the
/// original error as the root of the stack.
pub trait ConvertError: Sized {
    type Ok;
    fn convert_error(self) -> error_stack::Result<Self::Ok, KernelError>;
}
