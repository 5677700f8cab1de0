//! Errors for the filter pipeline.

use std::fmt;

use crate::error::InternalRenderingError;

/// Errors that can occur while rendering a single filter primitive.
#[derive(Debug, Clone)]
pub enum FilterError {
    /// The filter was passed invalid input (the `in`/`in2` attribute).
    InvalidInput,
    /// The filter was passed an invalid parameter.
    InvalidParameter(String),
    /// A Cairo error, from a failed intermediate surface creation or operation.
    CairoError(cairo::Error),
    /// A lighting filter's input surface is too small to estimate a surface normal.
    LightingInputTooSmall,
}

impl fmt::Display for FilterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            FilterError::InvalidInput => write!(f, "invalid value of the `in` attribute"),
            FilterError::InvalidParameter(ref s) => write!(f, "invalid parameter value: {s}"),
            FilterError::CairoError(ref status) => write!(f, "Cairo error: {status}"),
            FilterError::LightingInputTooSmall => write!(
                f,
                "lighting filter input surface is too small (less than 2x2 pixels)"
            ),
        }
    }
}

impl From<cairo::Error> for FilterError {
    #[inline]
    fn from(e: cairo::Error) -> Self {
        FilterError::CairoError(e)
    }
}

impl From<FilterError> for InternalRenderingError {
    fn from(e: FilterError) -> Self {
        match e {
            FilterError::CairoError(status) => InternalRenderingError::from(status),
            _ => InternalRenderingError::Rendering(format!("{e}")),
        }
    }
}

/// Errors that can occur while resolving a `<filter>` element's primitives into a
/// [`super::FilterSpec`], before any rendering is attempted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterResolveError {
    /// A `url(#foo)` reference in a `filter` property did not resolve to a `<filter>` element.
    ReferenceToNonFilterElement,
    /// A lighting filter primitive has zero or more than one light source children.
    InvalidLightSourceCount,
}

impl fmt::Display for FilterResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            FilterResolveError::ReferenceToNonFilterElement => {
                write!(f, "reference is not to a filter element")
            }
            FilterResolveError::InvalidLightSourceCount => {
                write!(f, "lighting filter has an invalid number of light sources")
            }
        }
    }
}
