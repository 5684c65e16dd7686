use std::io::{Read, Seek};

use super::{ContainerError, MatReader, Variable, VariableInfo};

/// Iterator over record metadata, data left on disk
pub struct VariableInfos<'a, R> {
    pub(super) reader: &'a mut MatReader<R>,
}

impl<R: Read + Seek> Iterator for VariableInfos<'_, R> {
    type Item = Result<VariableInfo, ContainerError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.reader.next_info().transpose()
    }
}

/// Iterator over fully decoded records
pub struct Variables<'a, R> {
    pub(super) reader: &'a mut MatReader<R>,
}

impl<R: Read + Seek> Iterator for Variables<'_, R> {
    type Item = Result<Variable, ContainerError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.reader.next_variable().transpose()
    }
}
