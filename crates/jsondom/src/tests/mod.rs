mod patching;
mod printing;
