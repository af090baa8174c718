mod binding;
mod registry;
